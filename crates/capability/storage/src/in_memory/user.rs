//! 用户内存存储实现
//!
//! 仅用于本地演示和测试。

use crate::error::StorageError;
use crate::models::UserRecord;
use crate::traits::UserStore;
use crate::validation::ensure_user_id;
use std::collections::HashMap;
use std::sync::RwLock;

/// 用户内存存储
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// 创建带默认 admin 账户的存储（口令明文 "admin123"，首次登录后迁移为 argon2）
    pub fn with_default_admin() -> Self {
        let store = Self::new();
        store.seed_user(UserRecord {
            user_id: "user-admin".to_string(),
            username: "admin".to_string(),
            password: "admin123".to_string(),
            refresh_jti: None,
        });
        store
    }

    /// 预置一个用户（测试用）
    pub fn seed_user(&self, record: UserRecord) {
        if let Ok(mut map) = self.users.write() {
            map.insert(record.user_id.clone(), record);
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        let item = self
            .users
            .read()
            .ok()
            .and_then(|map| map.values().find(|user| user.username == username).cloned());
        Ok(item)
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        ensure_user_id(user_id)?;
        let item = self
            .users
            .read()
            .ok()
            .and_then(|map| map.get(user_id).cloned());
        Ok(item)
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        ensure_user_id(user_id)?;
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match map.get_mut(user_id) {
            Some(user) => {
                user.password = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_refresh_jti(
        &self,
        user_id: &str,
        jti: Option<&str>,
    ) -> Result<bool, StorageError> {
        ensure_user_id(user_id)?;
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match map.get_mut(user_id) {
            Some(user) => {
                user.refresh_jti = jti.map(|value| value.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_refresh_jti(&self, user_id: &str) -> Result<Option<String>, StorageError> {
        ensure_user_id(user_id)?;
        let jti = self
            .users
            .read()
            .ok()
            .and_then(|map| map.get(user_id).and_then(|user| user.refresh_jti.clone()));
        Ok(jti)
    }
}
