pub mod device;
pub mod sleep;

pub use device::{ConfirmState, DeviceKind, RelationFlag};
pub use sleep::SleepStage;

/// 用户上下文：所有模块共享的执行上下文。
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: String,
    pub username: String,
}

impl UserContext {
    /// 构造显式身份的用户上下文。
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
        }
    }
}

impl Default for UserContext {
    /// 空上下文（仅用于测试或占位）。
    fn default() -> Self {
        Self {
            user_id: "".to_string(),
            username: "".to_string(),
        }
    }
}
