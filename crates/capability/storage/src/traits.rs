//! 存储接口 Trait 定义
//!
//! 定义所有资源存储的异步接口：
//! - UserStore：用户存储
//! - DeviceStore：设备存储（按 mac 唯一）
//! - RelationStore：用户-设备关系存储
//! - ShareStore：分享记录存储
//! - TransferStore：转让记录存储
//! - SleepDataStore：睡眠时序数据存储
//! - VitalsStore：体征时序数据存储
//! - NotifySettingStore：通知设置存储
//!
//! 设计原则：
//! - 作用域（user_id / device_id）显式出现在参数中
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{
    DevicePatch, DeviceRecord, NotifySettingRecord, NotifySettingUpdate, RelationRecord,
    ShareRecord, SleepPeriodRecord, SleepSampleRecord, TransferRecord, UserRecord,
    VitalsSampleRecord,
};
use async_trait::async_trait;
use domain::ConfirmState;

/// 用户存储接口
///
/// 提供认证所需的用户查询与 refresh token 绑定。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 根据用户名查找用户
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 根据用户 ID 查找用户
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 更新口令哈希（旧格式登录成功后迁移）
    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError>;

    /// 绑定/清除当前有效的 refresh jti
    async fn set_refresh_jti(
        &self,
        user_id: &str,
        jti: Option<&str>,
    ) -> Result<bool, StorageError>;

    /// 读取当前绑定的 refresh jti
    async fn get_refresh_jti(&self, user_id: &str) -> Result<Option<String>, StorageError>;
}

/// 设备存储接口
///
/// 注册按 mac upsert；设备本体不随关系删除而删除。
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// 按硬件地址查找设备
    async fn find_by_mac(&self, mac: &str) -> Result<Option<DeviceRecord>, StorageError>;

    /// 按设备 ID 查找设备
    async fn find_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError>;

    /// 创建新设备
    async fn insert_device(&self, record: DeviceRecord) -> Result<DeviceRecord, StorageError>;

    /// 部分更新设备（字段缺省不修改）
    async fn update_device(
        &self,
        device_id: &str,
        patch: DevicePatch,
    ) -> Result<Option<DeviceRecord>, StorageError>;
}

/// 用户-设备关系存储接口
#[async_trait]
pub trait RelationStore: Send + Sync {
    /// 列出用户的所有关系
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<RelationRecord>, StorageError>;

    /// 列出设备的所有关系
    async fn list_for_device(&self, device_id: &str) -> Result<Vec<RelationRecord>, StorageError>;

    /// 查找 (user, device) 对应的关系行
    async fn find(
        &self,
        user_id: &str,
        device_id: &str,
    ) -> Result<Option<RelationRecord>, StorageError>;

    /// 查找设备的 Normal 关系（唯一拥有者）
    async fn find_normal(&self, device_id: &str) -> Result<Option<RelationRecord>, StorageError>;

    /// 插入关系行
    async fn insert(&self, record: RelationRecord) -> Result<RelationRecord, StorageError>;

    /// 删除 (user, device) 的关系行
    async fn delete(&self, user_id: &str, device_id: &str) -> Result<bool, StorageError>;
}

/// 分享记录存储接口
#[async_trait]
pub trait ShareStore: Send + Sync {
    /// 按分享 ID 查找
    async fn find_share(&self, share_id: &str) -> Result<Option<ShareRecord>, StorageError>;

    /// 查找完全相同的 (from, to, device) 分享（不区分确认状态）
    async fn find_exact(
        &self,
        from_user_id: &str,
        to_user_id: &str,
        device_id: &str,
    ) -> Result<Option<ShareRecord>, StorageError>;

    /// 查找接收方在该设备上的待确认分享
    async fn find_pending_for_recipient(
        &self,
        to_user_id: &str,
        device_id: &str,
    ) -> Result<Option<ShareRecord>, StorageError>;

    /// 列出与用户相关的分享（发起或接收）
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ShareRecord>, StorageError>;

    /// 列出某用户对某设备发起的全部分享
    async fn list_from_user_for_device(
        &self,
        from_user_id: &str,
        device_id: &str,
    ) -> Result<Vec<ShareRecord>, StorageError>;

    /// 插入分享记录
    async fn insert(&self, record: ShareRecord) -> Result<ShareRecord, StorageError>;

    /// 更新确认状态
    async fn set_confirm(
        &self,
        share_id: &str,
        confirm: ConfirmState,
    ) -> Result<bool, StorageError>;

    /// 删除分享记录
    async fn delete(&self, share_id: &str) -> Result<bool, StorageError>;
}

/// 转让记录存储接口
#[async_trait]
pub trait TransferStore: Send + Sync {
    /// 按转让 ID 查找
    async fn find_transfer(
        &self,
        transfer_id: &str,
    ) -> Result<Option<TransferRecord>, StorageError>;

    /// 查找完全相同的 (from, to, device) 转让（不区分确认状态）
    async fn find_exact(
        &self,
        from_user_id: &str,
        to_user_id: &str,
        device_id: &str,
    ) -> Result<Option<TransferRecord>, StorageError>;

    /// 查找接收方在该设备上的待确认转让
    async fn find_pending_for_recipient(
        &self,
        to_user_id: &str,
        device_id: &str,
    ) -> Result<Option<TransferRecord>, StorageError>;

    /// 列出引用该设备的全部转让记录
    async fn list_for_device(&self, device_id: &str)
    -> Result<Vec<TransferRecord>, StorageError>;

    /// 插入转让记录
    async fn insert(&self, record: TransferRecord) -> Result<TransferRecord, StorageError>;

    /// 更新确认状态
    async fn set_confirm(
        &self,
        transfer_id: &str,
        confirm: ConfirmState,
    ) -> Result<bool, StorageError>;

    /// 删除转让记录
    async fn delete(&self, transfer_id: &str) -> Result<bool, StorageError>;

    /// 删除引用该设备的全部转让记录，返回删除行数
    async fn delete_for_device(&self, device_id: &str) -> Result<u64, StorageError>;
}

/// 睡眠时序数据存储接口
///
/// 两种数据形态按设备族分别写入；查询均按时间升序返回。
#[async_trait]
pub trait SleepDataStore: Send + Sync {
    /// 查询逐样本数据（闭区间，按 ts 升序）
    async fn list_samples(
        &self,
        device_id: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<SleepSampleRecord>, StorageError>;

    /// 查询分期报告数据（闭区间，按 ts 升序）
    async fn list_periods(
        &self,
        device_id: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<SleepPeriodRecord>, StorageError>;

    /// 写入逐样本数据
    async fn insert_sample(&self, record: SleepSampleRecord) -> Result<(), StorageError>;

    /// 写入分期报告数据
    async fn insert_period(&self, record: SleepPeriodRecord) -> Result<(), StorageError>;
}

/// 体征时序数据存储接口
#[async_trait]
pub trait VitalsStore: Send + Sync {
    /// 查询体征样本（闭区间，按 ts 升序）
    async fn list_samples(
        &self,
        device_id: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<VitalsSampleRecord>, StorageError>;

    /// 写入体征样本
    async fn insert_sample(&self, record: VitalsSampleRecord) -> Result<(), StorageError>;
}

/// 通知设置存储接口
#[async_trait]
pub trait NotifySettingStore: Send + Sync {
    /// 查找 (user, device) 的通知设置
    async fn find(
        &self,
        user_id: &str,
        device_id: &str,
    ) -> Result<Option<NotifySettingRecord>, StorageError>;

    /// 插入通知设置
    async fn insert(
        &self,
        record: NotifySettingRecord,
    ) -> Result<NotifySettingRecord, StorageError>;

    /// 部分更新通知设置（不存在返回 None）
    async fn update(
        &self,
        user_id: &str,
        device_id: &str,
        update: NotifySettingUpdate,
    ) -> Result<Option<NotifySettingRecord>, StorageError>;
}
