//! Postgres 分享记录存储实现

use crate::error::StorageError;
use crate::models::ShareRecord;
use crate::traits::ShareStore;
use crate::validation::{ensure_device_id, ensure_user_id};
use domain::ConfirmState;
use sqlx::{PgPool, Row};

pub struct PgShareStore {
    pub pool: PgPool,
}

impl PgShareStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_share(row: &sqlx::postgres::PgRow) -> Result<ShareRecord, StorageError> {
    let confirm: String = row.try_get("confirm")?;
    let confirm: ConfirmState = confirm.parse().map_err(StorageError::new)?;
    Ok(ShareRecord {
        share_id: row.try_get("share_id")?,
        from_user_id: row.try_get("from_user_id")?,
        to_user_id: row.try_get("to_user_id")?,
        device_id: row.try_get("device_id")?,
        remark: row.try_get("remark")?,
        confirm,
    })
}

const SHARE_COLUMNS: &str = "share_id, from_user_id, to_user_id, device_id, remark, confirm";

#[async_trait::async_trait]
impl ShareStore for PgShareStore {
    async fn find_share(&self, share_id: &str) -> Result<Option<ShareRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {SHARE_COLUMNS} from user_share_devices where share_id = $1"
        ))
        .bind(share_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_share).transpose()
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
        let row = sqlx::query(&format!(
            "select {SHARE_COLUMNS} from user_share_devices \
             where from_user_id = $1 and to_user_id = $2 and device_id = $3"
        ))
        .bind(from_user_id)
        .bind(to_user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_share).transpose()
    }

    async fn find_pending_for_recipient(
        &self,
        to_user_id: &str,
        device_id: &str,
    ) -> Result<Option<ShareRecord>, StorageError> {
        ensure_user_id(to_user_id)?;
        ensure_device_id(device_id)?;
        let row = sqlx::query(&format!(
            "select {SHARE_COLUMNS} from user_share_devices \
             where to_user_id = $1 and device_id = $2 and confirm = 'unconfirmed'"
        ))
        .bind(to_user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_share).transpose()
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ShareRecord>, StorageError> {
        ensure_user_id(user_id)?;
        let rows = sqlx::query(&format!(
            "select {SHARE_COLUMNS} from user_share_devices \
             where from_user_id = $1 or to_user_id = $1"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_share).collect()
    }

    async fn list_from_user_for_device(
        &self,
        from_user_id: &str,
        device_id: &str,
    ) -> Result<Vec<ShareRecord>, StorageError> {
        ensure_user_id(from_user_id)?;
        ensure_device_id(device_id)?;
        let rows = sqlx::query(&format!(
            "select {SHARE_COLUMNS} from user_share_devices \
             where from_user_id = $1 and device_id = $2"
        ))
        .bind(from_user_id)
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_share).collect()
    }

    async fn insert(&self, record: ShareRecord) -> Result<ShareRecord, StorageError> {
        ensure_user_id(&record.from_user_id)?;
        ensure_user_id(&record.to_user_id)?;
        ensure_device_id(&record.device_id)?;
        sqlx::query(
            "insert into user_share_devices \
             (share_id, from_user_id, to_user_id, device_id, remark, confirm) \
             values ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&record.share_id)
        .bind(&record.from_user_id)
        .bind(&record.to_user_id)
        .bind(&record.device_id)
        .bind(&record.remark)
        .bind(record.confirm.as_str())
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn set_confirm(
        &self,
        share_id: &str,
        confirm: ConfirmState,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query("update user_share_devices set confirm = $1 where share_id = $2")
            .bind(confirm.as_str())
            .bind(share_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, share_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from user_share_devices where share_id = $1")
            .bind(share_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
