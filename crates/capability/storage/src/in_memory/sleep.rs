//! 睡眠时序数据内存存储实现
//!
//! 仅用于本地演示和测试。查询按 ts 升序返回。

use crate::error::StorageError;
use crate::models::{SleepPeriodRecord, SleepSampleRecord};
use crate::traits::SleepDataStore;
use crate::validation::ensure_device_id;
use std::sync::RwLock;

/// 睡眠数据内存存储
pub struct InMemorySleepDataStore {
    samples: RwLock<Vec<SleepSampleRecord>>,
    periods: RwLock<Vec<SleepPeriodRecord>>,
}

impl InMemorySleepDataStore {
    pub fn new() -> Self {
        Self {
            samples: RwLock::new(Vec::new()),
            periods: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemorySleepDataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SleepDataStore for InMemorySleepDataStore {
    async fn list_samples(
        &self,
        device_id: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<SleepSampleRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let mut items: Vec<SleepSampleRecord> = self
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

    async fn list_periods(
        &self,
        device_id: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<SleepPeriodRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let mut items: Vec<SleepPeriodRecord> = self
            .periods
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

    async fn insert_sample(&self, record: SleepSampleRecord) -> Result<(), StorageError> {
        ensure_device_id(&record.device_id)?;
        let mut list = self
            .samples
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        list.push(record);
        Ok(())
    }

    async fn insert_period(&self, record: SleepPeriodRecord) -> Result<(), StorageError> {
        ensure_device_id(&record.device_id)?;
        let mut list = self
            .periods
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        list.push(record);
        Ok(())
    }
}
