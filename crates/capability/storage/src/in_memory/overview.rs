//! 设备总览缓存内存实现
//!
//! 仅用于本地演示和测试。

use crate::error::StorageError;
use crate::overview::OverviewCache;
use std::collections::HashMap;
use std::sync::RwLock;

/// 总览缓存内存存储
pub struct InMemoryOverviewCache {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryOverviewCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryOverviewCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl OverviewCache for InMemoryOverviewCache {
    async fn get_overview(&self, device_id: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .entries
            .read()
            .ok()
            .and_then(|map| map.get(device_id).cloned());
        Ok(value)
    }

    async fn put_overview(&self, device_id: &str, payload: &str) -> Result<(), StorageError> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        map.insert(device_id.to_string(), payload.to_string());
        Ok(())
    }

    async fn invalidate_overview(&self, device_id: &str) -> Result<(), StorageError> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        map.remove(device_id);
        Ok(())
    }
}
