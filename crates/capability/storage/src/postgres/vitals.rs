//! Postgres 体征时序数据存储实现

use crate::error::StorageError;
use crate::models::VitalsSampleRecord;
use crate::traits::VitalsStore;
use crate::validation::ensure_device_id;
use sqlx::{PgPool, Row};

pub struct PgVitalsStore {
    pub pool: PgPool,
}

impl PgVitalsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl VitalsStore for PgVitalsStore {
    async fn list_samples(
        &self,
        device_id: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<VitalsSampleRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let rows = sqlx::query(
            "select device_id, ts, heart_rate, breath_rate, physical \
             from vitals_samples \
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
            samples.push(VitalsSampleRecord {
                device_id: row.try_get("device_id")?,
                ts: row.try_get("ts")?,
                heart_rate: row.try_get("heart_rate")?,
                breath_rate: row.try_get("breath_rate")?,
                physical: row.try_get("physical")?,
            });
        }
        Ok(samples)
    }

    async fn insert_sample(&self, record: VitalsSampleRecord) -> Result<(), StorageError> {
        ensure_device_id(&record.device_id)?;
        sqlx::query(
            "insert into vitals_samples (device_id, ts, heart_rate, breath_rate, physical) \
             values ($1, $2, $3, $4, $5)",
        )
        .bind(&record.device_id)
        .bind(record.ts)
        .bind(record.heart_rate)
        .bind(record.breath_rate)
        .bind(record.physical)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
