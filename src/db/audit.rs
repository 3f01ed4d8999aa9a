use async_trait::async_trait;
use sqlx::PgPool;

use crate::audit::{AuditStore, StorageError};
use crate::models::{AuditRecord, NewAuditRecord};

pub async fn insert(pool: &PgPool, record: &NewAuditRecord) -> Result<AuditRecord, sqlx::Error> {
    sqlx::query_as::<_, AuditRecord>(
        "INSERT INTO activity_logs (subject, action, actor_role, occurred_at)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&record.subject)
    .bind(&record.action)
    .bind(&record.actor_role)
    .bind(record.occurred_at)
    .fetch_one(pool)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<AuditRecord>, sqlx::Error> {
    sqlx::query_as::<_, AuditRecord>(
        "SELECT * FROM activity_logs ORDER BY occurred_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

/// [`AuditStore`] over the `activity_logs` table.
#[derive(Clone)]
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn insert(&self, record: NewAuditRecord) -> Result<AuditRecord, StorageError> {
        Ok(insert(&self.pool, &record).await?)
    }

    async fn scan_newest_first(&self) -> Result<Vec<AuditRecord>, StorageError> {
        Ok(list_all(&self.pool).await?)
    }
}
