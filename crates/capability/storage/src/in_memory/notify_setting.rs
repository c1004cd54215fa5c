//! 通知设置内存存储实现
//!
//! 仅用于本地演示和测试。

use crate::error::StorageError;
use crate::models::{NotifySettingRecord, NotifySettingUpdate};
use crate::traits::NotifySettingStore;
use crate::validation::{ensure_device_id, ensure_user_id};
use std::collections::HashMap;
use std::sync::RwLock;

fn key(user_id: &str, device_id: &str) -> (String, String) {
    (user_id.to_string(), device_id.to_string())
}

/// 通知设置内存存储，键为 (user_id, device_id)。
pub struct InMemoryNotifySettingStore {
    settings: RwLock<HashMap<(String, String), NotifySettingRecord>>,
}

impl InMemoryNotifySettingStore {
    pub fn new() -> Self {
        Self {
            settings: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryNotifySettingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl NotifySettingStore for InMemoryNotifySettingStore {
    async fn find(
        &self,
        user_id: &str,
        device_id: &str,
    ) -> Result<Option<NotifySettingRecord>, StorageError> {
        ensure_user_id(user_id)?;
        ensure_device_id(device_id)?;
        let item = self
            .settings
            .read()
            .ok()
            .and_then(|map| map.get(&key(user_id, device_id)).cloned());
        Ok(item)
    }

    async fn insert(
        &self,
        record: NotifySettingRecord,
    ) -> Result<NotifySettingRecord, StorageError> {
        ensure_user_id(&record.user_id)?;
        ensure_device_id(&record.device_id)?;
        let mut map = self
            .settings
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let map_key = key(&record.user_id, &record.device_id);
        if map.contains_key(&map_key) {
            return Err(StorageError::new("notify setting exists"));
        }
        map.insert(map_key, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        user_id: &str,
        device_id: &str,
        update: NotifySettingUpdate,
    ) -> Result<Option<NotifySettingRecord>, StorageError> {
        ensure_user_id(user_id)?;
        ensure_device_id(device_id)?;
        let mut map = self
            .settings
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let setting = match map.get_mut(&key(user_id, device_id)) {
            Some(setting) => setting,
            None => return Ok(None),
        };
        if let Some(alarm_enabled) = update.alarm_enabled {
            setting.alarm_enabled = alarm_enabled;
        }
        if let Some(high) = update.heart_rate_high {
            setting.heart_rate_high = Some(high);
        }
        if let Some(low) = update.heart_rate_low {
            setting.heart_rate_low = Some(low);
        }
        if let Some(leave_bed_alarm) = update.leave_bed_alarm {
            setting.leave_bed_alarm = leave_bed_alarm;
        }
        Ok(Some(setting.clone()))
    }
}
