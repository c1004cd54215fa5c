//! 分享记录内存存储实现
//!
//! 仅用于本地演示和测试。

use crate::error::StorageError;
use crate::models::ShareRecord;
use crate::traits::ShareStore;
use crate::validation::{ensure_device_id, ensure_user_id};
use domain::ConfirmState;
use std::collections::HashMap;
use std::sync::RwLock;

/// 分享内存存储，键为 share_id。
pub struct InMemoryShareStore {
    shares: RwLock<HashMap<String, ShareRecord>>,
}

impl InMemoryShareStore {
    pub fn new() -> Self {
        Self {
            shares: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryShareStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ShareStore for InMemoryShareStore {
    async fn find_share(&self, share_id: &str) -> Result<Option<ShareRecord>, StorageError> {
        let item = self
            .shares
            .read()
            .ok()
            .and_then(|map| map.get(share_id).cloned());
        Ok(item)
    }

    async fn find_exact(
        &self,
        from_user_id: &str,
        to_user_id: &str,
        device_id: &str,
    ) -> Result<Option<ShareRecord>, StorageError> {
        ensure_user_id(from_user_id)?;
        ensure_user_id(to_user_id)?;
        ensure_device_id(device_id)?;
        let item = self.shares.read().ok().and_then(|map| {
            map.values()
                .find(|item| {
                    item.from_user_id == from_user_id
                        && item.to_user_id == to_user_id
                        && item.device_id == device_id
                })
                .cloned()
        });
        Ok(item)
    }

    async fn find_pending_for_recipient(
        &self,
        to_user_id: &str,
        device_id: &str,
    ) -> Result<Option<ShareRecord>, StorageError> {
        ensure_user_id(to_user_id)?;
        ensure_device_id(device_id)?;
        let item = self.shares.read().ok().and_then(|map| {
            map.values()
                .find(|item| {
                    item.to_user_id == to_user_id
                        && item.device_id == device_id
                        && item.confirm == ConfirmState::Unconfirmed
                })
                .cloned()
        });
        Ok(item)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ShareRecord>, StorageError> {
        ensure_user_id(user_id)?;
        let items = self
            .shares
            .read()
            .map(|map| {
                map.values()
                    .filter(|item| item.from_user_id == user_id || item.to_user_id == user_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(items)
    }

    async fn list_from_user_for_device(
        &self,
        from_user_id: &str,
        device_id: &str,
    ) -> Result<Vec<ShareRecord>, StorageError> {
        ensure_user_id(from_user_id)?;
        ensure_device_id(device_id)?;
        let items = self
            .shares
            .read()
            .map(|map| {
                map.values()
                    .filter(|item| {
                        item.from_user_id == from_user_id && item.device_id == device_id
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(items)
    }

    async fn insert(&self, record: ShareRecord) -> Result<ShareRecord, StorageError> {
        ensure_user_id(&record.from_user_id)?;
        ensure_user_id(&record.to_user_id)?;
        ensure_device_id(&record.device_id)?;
        let mut map = self
            .shares
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.share_id) {
            return Err(StorageError::new("share exists"));
        }
        map.insert(record.share_id.clone(), record.clone());
        Ok(record)
    }

    async fn set_confirm(
        &self,
        share_id: &str,
        confirm: ConfirmState,
    ) -> Result<bool, StorageError> {
        let mut map = self
            .shares
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match map.get_mut(share_id) {
            Some(share) => {
                share.confirm = confirm;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, share_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .shares
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(share_id).is_some())
    }
}
