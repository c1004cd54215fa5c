//! 用户-设备关系内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 单一 Normal 不变式由 ownership 引擎在写入前检查，
//! 存储层只保证 (user, device) 行唯一。

use crate::error::StorageError;
use crate::models::RelationRecord;
use crate::traits::RelationStore;
use crate::validation::{ensure_device_id, ensure_user_id};
use domain::RelationFlag;
use std::collections::HashMap;
use std::sync::RwLock;

/// 关系内存存储，键为 relation_id。
pub struct InMemoryRelationStore {
    relations: RwLock<HashMap<String, RelationRecord>>,
}

impl InMemoryRelationStore {
    pub fn new() -> Self {
        Self {
            relations: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRelationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RelationStore for InMemoryRelationStore {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<RelationRecord>, StorageError> {
        ensure_user_id(user_id)?;
        let items = self
            .relations
            .read()
            .map(|map| {
                map.values()
                    .filter(|item| item.user_id == user_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(items)
    }

    async fn list_for_device(&self, device_id: &str) -> Result<Vec<RelationRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let items = self
            .relations
            .read()
            .map(|map| {
                map.values()
                    .filter(|item| item.device_id == device_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(items)
    }

    async fn find(
        &self,
        user_id: &str,
        device_id: &str,
    ) -> Result<Option<RelationRecord>, StorageError> {
        ensure_user_id(user_id)?;
        ensure_device_id(device_id)?;
        let item = self.relations.read().ok().and_then(|map| {
            map.values()
                .find(|item| item.user_id == user_id && item.device_id == device_id)
                .cloned()
        });
        Ok(item)
    }

    async fn find_normal(&self, device_id: &str) -> Result<Option<RelationRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let item = self.relations.read().ok().and_then(|map| {
            map.values()
                .find(|item| item.device_id == device_id && item.flag == RelationFlag::Normal)
                .cloned()
        });
        Ok(item)
    }

    async fn insert(&self, record: RelationRecord) -> Result<RelationRecord, StorageError> {
        ensure_user_id(&record.user_id)?;
        ensure_device_id(&record.device_id)?;
        let mut map = self
            .relations
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let duplicate = map
            .values()
            .any(|item| item.user_id == record.user_id && item.device_id == record.device_id);
        if duplicate {
            return Err(StorageError::new("relation exists"));
        }
        map.insert(record.relation_id.clone(), record.clone());
        Ok(record)
    }

    async fn delete(&self, user_id: &str, device_id: &str) -> Result<bool, StorageError> {
        ensure_user_id(user_id)?;
        ensure_device_id(device_id)?;
        let mut map = self
            .relations
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let key = map
            .iter()
            .find(|(_, item)| item.user_id == user_id && item.device_id == device_id)
            .map(|(key, _)| key.clone());
        match key {
            Some(key) => {
                map.remove(&key);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
