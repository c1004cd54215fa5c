//! 数据模型
//!
//! 定义所有存储相关的数据模型和更新结构：
//! - 用户模型：UserRecord
//! - 设备模型：DeviceRecord, DevicePatch（按 mac 唯一）
//! - 关系模型：RelationRecord（Normal/Shared，单一 Normal 不变式）
//! - 分享模型：ShareRecord
//! - 转让模型：TransferRecord
//! - 睡眠数据：SleepSampleRecord（逐样本）, SleepPeriodRecord（分期报告）
//! - 体征数据：VitalsSampleRecord
//! - 通知设置：NotifySettingRecord, NotifySettingUpdate

use domain::{ConfirmState, DeviceKind, RelationFlag};

/// 用户记录（认证用）。
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: String,
    pub username: String,
    pub password: String,
    /// 当前有效的 refresh token 标识（登出/轮换后失效旧 token）
    pub refresh_jti: Option<String>,
}

impl UserRecord {
    /// 将用户记录转换为 UserContext。
    pub fn to_user_context(&self) -> domain::UserContext {
        domain::UserContext::new(self.user_id.clone(), self.username.clone())
    }
}

/// 设备记录。
///
/// `mac` 全局唯一；注册按 mac upsert。
#[derive(Debug, Clone)]
pub struct DeviceRecord {
    pub device_id: String,
    pub mac: String,
    pub name: String,
    pub kind: DeviceKind,
    pub remark: Option<String>,
}

/// 设备部分更新输入。
#[derive(Debug, Clone, Default)]
pub struct DevicePatch {
    pub name: Option<String>,
    pub kind: Option<DeviceKind>,
    pub remark: Option<String>,
}

impl DevicePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.kind.is_none() && self.remark.is_none()
    }
}

/// 用户-设备关系记录。
///
/// 不变式（应用层保证）：每设备至多一条 Normal；每 (user, device) 至多一行。
#[derive(Debug, Clone)]
pub struct RelationRecord {
    pub relation_id: String,
    pub user_id: String,
    pub device_id: String,
    pub flag: RelationFlag,
}

/// 分享记录：待确认或已确认的设备分享。
#[derive(Debug, Clone)]
pub struct ShareRecord {
    pub share_id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub device_id: String,
    pub remark: Option<String>,
    pub confirm: ConfirmState,
}

/// 转让记录：待确认或已确认的归属转让。
#[derive(Debug, Clone)]
pub struct TransferRecord {
    pub transfer_id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub device_id: String,
    pub remark: Option<String>,
    pub confirm: ConfirmState,
}

/// 逐样本睡眠数据（心率类设备）。
///
/// `stage` 编码：1=清醒，2=浅睡，3=深睡。
#[derive(Debug, Clone)]
pub struct SleepSampleRecord {
    pub device_id: String,
    /// epoch 秒
    pub ts: i64,
    pub stage: i16,
    /// 本样本是否带翻身事件
    pub turn_over: bool,
    pub active: i16,
}

/// 分期报告睡眠数据（ed713/X1 类设备）。
///
/// `periodization` 编码：0=无人，1=清醒，2=浅睡，3=深睡。
/// `event` 编码：0=无，1=翻身，2=离床。
#[derive(Debug, Clone)]
pub struct SleepPeriodRecord {
    pub device_id: String,
    /// 分期时间戳（epoch 秒）
    pub ts: i64,
    pub periodization: i16,
    pub event: i16,
    /// 所属睡眠会话起始时间；变化即为新会话
    pub session_start: i64,
    pub session_end: i64,
}

/// 体征样本（心率/呼吸率/体动综合）。
#[derive(Debug, Clone)]
pub struct VitalsSampleRecord {
    pub device_id: String,
    pub ts: i64,
    pub heart_rate: i32,
    pub breath_rate: i32,
    pub physical: i32,
}

/// 通知设置记录（按 user + device 唯一）。
#[derive(Debug, Clone)]
pub struct NotifySettingRecord {
    pub user_id: String,
    pub device_id: String,
    pub alarm_enabled: bool,
    pub heart_rate_high: Option<i32>,
    pub heart_rate_low: Option<i32>,
    pub leave_bed_alarm: bool,
}

impl NotifySettingRecord {
    /// 未配置时的默认设置。
    pub fn default_for(user_id: &str, device_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            device_id: device_id.to_string(),
            alarm_enabled: true,
            heart_rate_high: None,
            heart_rate_low: None,
            leave_bed_alarm: false,
        }
    }
}

/// 通知设置更新输入。
#[derive(Debug, Clone, Default)]
pub struct NotifySettingUpdate {
    pub alarm_enabled: Option<bool>,
    pub heart_rate_high: Option<i32>,
    pub heart_rate_low: Option<i32>,
    pub leave_bed_alarm: Option<bool>,
}
