//! 转让记录内存存储实现
//!
//! 仅用于本地演示和测试。

use crate::error::StorageError;
use crate::models::TransferRecord;
use crate::traits::TransferStore;
use crate::validation::{ensure_device_id, ensure_user_id};
use domain::ConfirmState;
use std::collections::HashMap;
use std::sync::RwLock;

/// 转让内存存储，键为 transfer_id。
pub struct InMemoryTransferStore {
    transfers: RwLock<HashMap<String, TransferRecord>>,
}

impl InMemoryTransferStore {
    pub fn new() -> Self {
        Self {
            transfers: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTransferStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TransferStore for InMemoryTransferStore {
    async fn find_transfer(
        &self,
        transfer_id: &str,
    ) -> Result<Option<TransferRecord>, StorageError> {
        let item = self
            .transfers
            .read()
            .ok()
            .and_then(|map| map.get(transfer_id).cloned());
        Ok(item)
    }

    async fn find_exact(
        &self,
        from_user_id: &str,
        to_user_id: &str,
        device_id: &str,
    ) -> Result<Option<TransferRecord>, StorageError> {
        ensure_user_id(from_user_id)?;
        ensure_user_id(to_user_id)?;
        ensure_device_id(device_id)?;
        let item = self.transfers.read().ok().and_then(|map| {
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
    ) -> Result<Option<TransferRecord>, StorageError> {
        ensure_user_id(to_user_id)?;
        ensure_device_id(device_id)?;
        let item = self.transfers.read().ok().and_then(|map| {
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

    async fn list_for_device(
        &self,
        device_id: &str,
    ) -> Result<Vec<TransferRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let items = self
            .transfers
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

    async fn insert(&self, record: TransferRecord) -> Result<TransferRecord, StorageError> {
        ensure_user_id(&record.from_user_id)?;
        ensure_user_id(&record.to_user_id)?;
        ensure_device_id(&record.device_id)?;
        let mut map = self
            .transfers
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.transfer_id) {
            return Err(StorageError::new("transfer exists"));
        }
        map.insert(record.transfer_id.clone(), record.clone());
        Ok(record)
    }

    async fn set_confirm(
        &self,
        transfer_id: &str,
        confirm: ConfirmState,
    ) -> Result<bool, StorageError> {
        let mut map = self
            .transfers
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match map.get_mut(transfer_id) {
            Some(transfer) => {
                transfer.confirm = confirm;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, transfer_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .transfers
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(transfer_id).is_some())
    }

    async fn delete_for_device(&self, device_id: &str) -> Result<u64, StorageError> {
        ensure_device_id(device_id)?;
        let mut map = self
            .transfers
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let keys: Vec<String> = map
            .iter()
            .filter(|(_, item)| item.device_id == device_id)
            .map(|(key, _)| key.clone())
            .collect();
        let removed = keys.len() as u64;
        for key in keys {
            map.remove(&key);
        }
        Ok(removed)
    }
}
