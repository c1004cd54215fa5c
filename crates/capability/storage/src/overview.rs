//! 设备总览缓存接口
//!
//! 设备总览是按设备聚合的展示用 JSON（最近状态、归属等），
//! 由查询侧按需构建并缓存；归属变更/设备移除时必须失效。

use crate::error::StorageError;
use async_trait::async_trait;

/// 设备总览缓存接口
#[async_trait]
pub trait OverviewCache: Send + Sync {
    /// 读取设备总览 JSON
    async fn get_overview(&self, device_id: &str) -> Result<Option<String>, StorageError>;

    /// 写入设备总览 JSON
    async fn put_overview(&self, device_id: &str, payload: &str) -> Result<(), StorageError>;

    /// 失效设备总览
    async fn invalidate_overview(&self, device_id: &str) -> Result<(), StorageError>;
}
