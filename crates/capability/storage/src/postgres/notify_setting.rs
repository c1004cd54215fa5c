//! Postgres 通知设置存储实现

use crate::error::StorageError;
use crate::models::{NotifySettingRecord, NotifySettingUpdate};
use crate::traits::NotifySettingStore;
use crate::validation::{ensure_device_id, ensure_user_id};
use sqlx::{PgPool, Row};

pub struct PgNotifySettingStore {
    pub pool: PgPool,
}

impl PgNotifySettingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_setting(row: &sqlx::postgres::PgRow) -> Result<NotifySettingRecord, StorageError> {
    Ok(NotifySettingRecord {
        user_id: row.try_get("user_id")?,
        device_id: row.try_get("device_id")?,
        alarm_enabled: row.try_get("alarm_enabled")?,
        heart_rate_high: row.try_get("heart_rate_high")?,
        heart_rate_low: row.try_get("heart_rate_low")?,
        leave_bed_alarm: row.try_get("leave_bed_alarm")?,
    })
}

#[async_trait::async_trait]
impl NotifySettingStore for PgNotifySettingStore {
    async fn find(
        &self,
        user_id: &str,
        device_id: &str,
    ) -> Result<Option<NotifySettingRecord>, StorageError> {
        ensure_user_id(user_id)?;
        ensure_device_id(device_id)?;
        let row = sqlx::query(
            "select user_id, device_id, alarm_enabled, heart_rate_high, heart_rate_low, \
             leave_bed_alarm \
             from notify_settings where user_id = $1 and device_id = $2",
        )
        .bind(user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_setting).transpose()
    }

    async fn insert(
        &self,
        record: NotifySettingRecord,
    ) -> Result<NotifySettingRecord, StorageError> {
        ensure_user_id(&record.user_id)?;
        ensure_device_id(&record.device_id)?;
        sqlx::query(
            "insert into notify_settings \
             (user_id, device_id, alarm_enabled, heart_rate_high, heart_rate_low, leave_bed_alarm) \
             values ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&record.user_id)
        .bind(&record.device_id)
        .bind(record.alarm_enabled)
        .bind(record.heart_rate_high)
        .bind(record.heart_rate_low)
        .bind(record.leave_bed_alarm)
        .execute(&self.pool)
        .await?;
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
        let row = sqlx::query(
            "update notify_settings set \
             alarm_enabled = coalesce($1, alarm_enabled), \
             heart_rate_high = coalesce($2, heart_rate_high), \
             heart_rate_low = coalesce($3, heart_rate_low), \
             leave_bed_alarm = coalesce($4, leave_bed_alarm) \
             where user_id = $5 and device_id = $6 \
             returning user_id, device_id, alarm_enabled, heart_rate_high, heart_rate_low, \
             leave_bed_alarm",
        )
        .bind(update.alarm_enabled)
        .bind(update.heart_rate_high)
        .bind(update.heart_rate_low)
        .bind(update.leave_bed_alarm)
        .bind(user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_setting).transpose()
    }
}
