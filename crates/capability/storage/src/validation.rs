//! 验证辅助函数
//!
//! 提供统一的验证逻辑，确保数据一致性：
//! - ensure_user_id：验证用户 ID 非空
//! - ensure_device_id：验证设备 ID 非空
//!
//! 所有关系/分享/转让写入前都应先通过这两个检查。

use crate::error::StorageError;

/// 验证用户 ID 非空
pub fn ensure_user_id(user_id: &str) -> Result<(), StorageError> {
    if user_id.is_empty() {
        return Err(StorageError::new("user_id required"));
    }
    Ok(())
}

/// 验证设备 ID 非空
pub fn ensure_device_id(device_id: &str) -> Result<(), StorageError> {
    if device_id.is_empty() {
        return Err(StorageError::new("device_id required"));
    }
    Ok(())
}
