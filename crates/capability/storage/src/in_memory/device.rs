//! 设备内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 设备按 mac 查找（注册 upsert 的基础）
//! - 设备部分更新

use crate::error::StorageError;
use crate::models::{DevicePatch, DeviceRecord};
use crate::traits::DeviceStore;
use crate::validation::ensure_device_id;
use std::collections::HashMap;
use std::sync::RwLock;

/// 设备内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryDeviceStore {
    devices: RwLock<HashMap<String, DeviceRecord>>,
}

impl InMemoryDeviceStore {
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DeviceStore for InMemoryDeviceStore {
    /// 按硬件地址查找设备
    async fn find_by_mac(&self, mac: &str) -> Result<Option<DeviceRecord>, StorageError> {
        let item = self
            .devices
            .read()
            .ok()
            .and_then(|map| map.values().find(|item| item.mac == mac).cloned());
        Ok(item)
    }

    /// 按设备 ID 查找设备
    async fn find_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let item = self
            .devices
            .read()
            .ok()
            .and_then(|map| map.get(device_id).cloned());
        Ok(item)
    }

    /// 创建新设备
    async fn insert_device(&self, record: DeviceRecord) -> Result<DeviceRecord, StorageError> {
        ensure_device_id(&record.device_id)?;
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.device_id) {
            return Err(StorageError::new("device exists"));
        }
        if map.values().any(|item| item.mac == record.mac) {
            return Err(StorageError::new("mac exists"));
        }
        map.insert(record.device_id.clone(), record.clone());
        Ok(record)
    }

    /// 部分更新设备
    async fn update_device(
        &self,
        device_id: &str,
        patch: DevicePatch,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let device = match map.get_mut(device_id) {
            Some(device) => device,
            None => return Ok(None),
        };
        if let Some(name) = patch.name {
            device.name = name;
        }
        if let Some(kind) = patch.kind {
            device.kind = kind;
        }
        if let Some(remark) = patch.remark {
            device.remark = Some(remark);
        }
        Ok(Some(device.clone()))
    }
}
