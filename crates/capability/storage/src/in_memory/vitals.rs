//! 体征时序数据内存存储实现
//!
//! 仅用于本地演示和测试。查询按 ts 升序返回。

use crate::error::StorageError;
use crate::models::VitalsSampleRecord;
use crate::traits::VitalsStore;
use crate::validation::ensure_device_id;
use std::sync::RwLock;

/// 体征数据内存存储
pub struct InMemoryVitalsStore {
    samples: RwLock<Vec<VitalsSampleRecord>>,
}

impl InMemoryVitalsStore {
    pub fn new() -> Self {
        Self {
            samples: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryVitalsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VitalsStore for InMemoryVitalsStore {
    async fn list_samples(
        &self,
        device_id: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<VitalsSampleRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let mut items: Vec<VitalsSampleRecord> = self
            .samples
            .read()
            .map(|list| {
                list.iter()
                    .filter(|item| {
                        item.device_id == device_id && item.ts >= start && item.ts <= end
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        items.sort_by_key(|item| item.ts);
        Ok(items)
    }

    async fn insert_sample(&self, record: VitalsSampleRecord) -> Result<(), StorageError> {
        ensure_device_id(&record.device_id)?;
        let mut list = self
            .samples
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        list.push(record);
        Ok(())
    }
}
