//! Postgres 转让记录存储实现

use crate::error::StorageError;
use crate::models::TransferRecord;
use crate::traits::TransferStore;
use crate::validation::{ensure_device_id, ensure_user_id};
use domain::ConfirmState;
use sqlx::{PgPool, Row};

pub struct PgTransferStore {
    pub pool: PgPool,
}

impl PgTransferStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_transfer(row: &sqlx::postgres::PgRow) -> Result<TransferRecord, StorageError> {
    let confirm: String = row.try_get("confirm")?;
    let confirm: ConfirmState = confirm.parse().map_err(StorageError::new)?;
    Ok(TransferRecord {
        transfer_id: row.try_get("transfer_id")?,
        from_user_id: row.try_get("from_user_id")?,
        to_user_id: row.try_get("to_user_id")?,
        device_id: row.try_get("device_id")?,
        remark: row.try_get("remark")?,
        confirm,
    })
}

const TRANSFER_COLUMNS: &str =
    "transfer_id, from_user_id, to_user_id, device_id, remark, confirm";

#[async_trait::async_trait]
impl TransferStore for PgTransferStore {
    async fn find_transfer(
        &self,
        transfer_id: &str,
    ) -> Result<Option<TransferRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {TRANSFER_COLUMNS} from user_transfer_devices where transfer_id = $1"
        ))
        .bind(transfer_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_transfer).transpose()
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
        let row = sqlx::query(&format!(
            "select {TRANSFER_COLUMNS} from user_transfer_devices \
             where from_user_id = $1 and to_user_id = $2 and device_id = $3"
        ))
        .bind(from_user_id)
        .bind(to_user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_transfer).transpose()
    }

    async fn find_pending_for_recipient(
        &self,
        to_user_id: &str,
        device_id: &str,
    ) -> Result<Option<TransferRecord>, StorageError> {
        ensure_user_id(to_user_id)?;
        ensure_device_id(device_id)?;
        let row = sqlx::query(&format!(
            "select {TRANSFER_COLUMNS} from user_transfer_devices \
             where to_user_id = $1 and device_id = $2 and confirm = 'unconfirmed'"
        ))
        .bind(to_user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_transfer).transpose()
    }

    async fn list_for_device(
        &self,
        device_id: &str,
    ) -> Result<Vec<TransferRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let rows = sqlx::query(&format!(
            "select {TRANSFER_COLUMNS} from user_transfer_devices where device_id = $1"
        ))
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_transfer).collect()
    }

    async fn insert(&self, record: TransferRecord) -> Result<TransferRecord, StorageError> {
        ensure_user_id(&record.from_user_id)?;
        ensure_user_id(&record.to_user_id)?;
        ensure_device_id(&record.device_id)?;
        sqlx::query(
            "insert into user_transfer_devices \
             (transfer_id, from_user_id, to_user_id, device_id, remark, confirm) \
             values ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&record.transfer_id)
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
        transfer_id: &str,
        confirm: ConfirmState,
    ) -> Result<bool, StorageError> {
        let result =
            sqlx::query("update user_transfer_devices set confirm = $1 where transfer_id = $2")
                .bind(confirm.as_str())
                .bind(transfer_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, transfer_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from user_transfer_devices where transfer_id = $1")
            .bind(transfer_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_device(&self, device_id: &str) -> Result<u64, StorageError> {
        ensure_device_id(device_id)?;
        let result = sqlx::query("delete from user_transfer_devices where device_id = $1")
            .bind(device_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
