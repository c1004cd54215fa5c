//! Postgres 用户-设备关系存储实现
//!
//! (user_id, device_id) 建唯一索引；Normal 唯一性由 ownership 引擎保证。

use crate::error::StorageError;
use crate::models::RelationRecord;
use crate::traits::RelationStore;
use crate::validation::{ensure_device_id, ensure_user_id};
use domain::RelationFlag;
use sqlx::{PgPool, Row};

pub struct PgRelationStore {
    pub pool: PgPool,
}

impl PgRelationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_relation(row: &sqlx::postgres::PgRow) -> Result<RelationRecord, StorageError> {
    let flag: String = row.try_get("flag")?;
    let flag: RelationFlag = flag.parse().map_err(StorageError::new)?;
    Ok(RelationRecord {
        relation_id: row.try_get("relation_id")?,
        user_id: row.try_get("user_id")?,
        device_id: row.try_get("device_id")?,
        flag,
    })
}

#[async_trait::async_trait]
impl RelationStore for PgRelationStore {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<RelationRecord>, StorageError> {
        ensure_user_id(user_id)?;
        let rows = sqlx::query(
            "select relation_id, user_id, device_id, flag \
             from user_device_relations where user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_relation).collect()
    }

    async fn list_for_device(&self, device_id: &str) -> Result<Vec<RelationRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let rows = sqlx::query(
            "select relation_id, user_id, device_id, flag \
             from user_device_relations where device_id = $1",
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_relation).collect()
    }

    async fn find(
        &self,
        user_id: &str,
        device_id: &str,
    ) -> Result<Option<RelationRecord>, StorageError> {
        ensure_user_id(user_id)?;
        ensure_device_id(device_id)?;
        let row = sqlx::query(
            "select relation_id, user_id, device_id, flag \
             from user_device_relations where user_id = $1 and device_id = $2",
        )
        .bind(user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_relation).transpose()
    }

    async fn find_normal(&self, device_id: &str) -> Result<Option<RelationRecord>, StorageError> {
        ensure_device_id(device_id)?;
        let row = sqlx::query(
            "select relation_id, user_id, device_id, flag \
             from user_device_relations where device_id = $1 and flag = 'normal'",
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_relation).transpose()
    }

    async fn insert(&self, record: RelationRecord) -> Result<RelationRecord, StorageError> {
        ensure_user_id(&record.user_id)?;
        ensure_device_id(&record.device_id)?;
        sqlx::query(
            "insert into user_device_relations (relation_id, user_id, device_id, flag) \
             values ($1, $2, $3, $4)",
        )
        .bind(&record.relation_id)
        .bind(&record.user_id)
        .bind(&record.device_id)
        .bind(record.flag.as_str())
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn delete(&self, user_id: &str, device_id: &str) -> Result<bool, StorageError> {
        ensure_user_id(user_id)?;
        ensure_device_id(device_id)?;
        let result = sqlx::query(
            "delete from user_device_relations where user_id = $1 and device_id = $2",
        )
        .bind(user_id)
        .bind(device_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
