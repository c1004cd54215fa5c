//! Postgres 设备存储实现
//!
//! 设计要点：
//! - `mac` 列全局唯一，注册侧按 mac upsert
//! - `kind` 以文本列存储，读取时解析回 DeviceKind

use crate::error::StorageError;
use crate::models::{DevicePatch, DeviceRecord};
use crate::traits::DeviceStore;
use crate::validation::ensure_device_id;
use domain::DeviceKind;
use sqlx::{PgPool, Row};

pub struct PgDeviceStore {
    pub pool: PgPool,
}

impl PgDeviceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn row_to_device(row: &sqlx::postgres::PgRow) -> Result<DeviceRecord, StorageError> {
    let kind: String = row.try_get("kind")?;
    let kind: DeviceKind = kind
        .parse()
        .map_err(|err: domain::device::UnknownDeviceKind| StorageError::new(err.to_string()))?;
    Ok(DeviceRecord {
        device_id: row.try_get("device_id")?,
        mac: row.try_get("mac")?,
        name: row.try_get("name")?,
        kind,
        remark: row.try_get("remark")?,
    })
}

#[async_trait::async_trait]
impl DeviceStore for PgDeviceStore {
    async fn find_by_mac(&self, mac: &str) -> Result<Option<DeviceRecord>, StorageError> {
        let row =
            sqlx::query("select device_id, mac, name, kind, remark from devices where mac = $1")
                .bind(mac)
                .fetch_optional(&self.pool)
                .await?;
        row.as_ref().map(row_to_device).transpose()
    }

    async fn find_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let row = sqlx::query(
            "select device_id, mac, name, kind, remark from devices where device_id = $1",
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_device).transpose()
    }

    async fn insert_device(&self, record: DeviceRecord) -> Result<DeviceRecord, StorageError> {
        ensure_device_id(&record.device_id)?;
        sqlx::query(
            "insert into devices (device_id, mac, name, kind, remark) \
             values ($1, $2, $3, $4, $5)",
        )
        .bind(&record.device_id)
        .bind(&record.mac)
        .bind(&record.name)
        .bind(record.kind.as_str())
        .bind(&record.remark)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_device(
        &self,
        device_id: &str,
        patch: DevicePatch,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let row = sqlx::query(
            "update devices set \
             name = coalesce($1, name), \
             kind = coalesce($2, kind), \
             remark = coalesce($3, remark) \
             where device_id = $4 \
             returning device_id, mac, name, kind, remark",
        )
        .bind(patch.name)
        .bind(patch.kind.map(|kind| kind.as_str().to_string()))
        .bind(patch.remark)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_device).transpose()
    }
}
