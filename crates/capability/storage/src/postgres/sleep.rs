//! Postgres 睡眠时序数据存储实现
//!
//! 查询按 (device_id, ts) 索引走闭区间过滤，升序返回。

use crate::error::StorageError;
use crate::models::{SleepPeriodRecord, SleepSampleRecord};
use crate::traits::SleepDataStore;
use crate::validation::ensure_device_id;
use sqlx::{PgPool, Row};

pub struct PgSleepDataStore {
    pub pool: PgPool,
}

impl PgSleepDataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SleepDataStore for PgSleepDataStore {
    async fn list_samples(
        &self,
        device_id: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<SleepSampleRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let rows = sqlx::query(
            "select device_id, ts, stage, turn_over, active \
             from sleep_samples \
             where device_id = $1 and ts >= $2 and ts <= $3 \
             order by ts asc",
        )
        .bind(device_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        let mut samples = Vec::with_capacity(rows.len());
        for row in rows {
            samples.push(SleepSampleRecord {
                device_id: row.try_get("device_id")?,
                ts: row.try_get("ts")?,
                stage: row.try_get("stage")?,
                turn_over: row.try_get("turn_over")?,
                active: row.try_get("active")?,
            });
        }
        Ok(samples)
    }

    async fn list_periods(
        &self,
        device_id: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<SleepPeriodRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let rows = sqlx::query(
            "select device_id, ts, periodization, event, session_start, session_end \
             from sleep_periods \
             where device_id = $1 and ts >= $2 and ts <= $3 \
             order by ts asc",
        )
        .bind(device_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        let mut periods = Vec::with_capacity(rows.len());
        for row in rows {
            periods.push(SleepPeriodRecord {
                device_id: row.try_get("device_id")?,
                ts: row.try_get("ts")?,
                periodization: row.try_get("periodization")?,
                event: row.try_get("event")?,
                session_start: row.try_get("session_start")?,
                session_end: row.try_get("session_end")?,
            });
        }
        Ok(periods)
    }

    async fn insert_sample(&self, record: SleepSampleRecord) -> Result<(), StorageError> {
        ensure_device_id(&record.device_id)?;
        sqlx::query(
            "insert into sleep_samples (device_id, ts, stage, turn_over, active) \
             values ($1, $2, $3, $4, $5)",
        )
        .bind(&record.device_id)
        .bind(record.ts)
        .bind(record.stage)
        .bind(record.turn_over)
        .bind(record.active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_period(&self, record: SleepPeriodRecord) -> Result<(), StorageError> {
        ensure_device_id(&record.device_id)?;
        sqlx::query(
            "insert into sleep_periods \
             (device_id, ts, periodization, event, session_start, session_end) \
             values ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&record.device_id)
        .bind(record.ts)
        .bind(record.periodization)
        .bind(record.event)
        .bind(record.session_start)
        .bind(record.session_end)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
