//! Activity log: every successful domain mutation leaves one immutable
//! [`AuditRecord`] behind, and the whole trail can be read back newest first.
//!
//! Handlers do not talk to the [`ActivityRecorder`] themselves. They return an
//! [`Activity`] next to their response body, and the `record_activity`
//! middleware appends it once the response is known to be successful.

#[cfg(test)]
pub(crate) mod testing;

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::{IntoResponseParts, ResponseParts};

use crate::models::{AuditRecord, NewAuditRecord};

#[derive(Debug)]
pub enum StorageError {
    Unavailable(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Unavailable(msg) => write!(f, "Storage unavailable: {msg}"),
            StorageError::Database(err) => write!(f, "Storage error: {err}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Database(err)
    }
}

/// Persistence seam for the activity log. Insert-only plus a full scan.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persists the record and returns it with its storage-assigned id.
    async fn insert(&self, record: NewAuditRecord) -> Result<AuditRecord, StorageError>;

    /// Every stored record, newest first.
    async fn scan_newest_first(&self) -> Result<Vec<AuditRecord>, StorageError>;
}

#[derive(Clone)]
pub struct ActivityRecorder {
    store: Arc<dyn AuditStore>,
}

impl ActivityRecorder {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Appends one record. Inputs are stored verbatim, including empty strings.
    pub async fn append(
        &self,
        subject: &str,
        action: &str,
        actor_role: &str,
    ) -> Result<AuditRecord, StorageError> {
        let record = NewAuditRecord::stamped(subject, action, actor_role);
        self.store.insert(record).await
    }
}

#[derive(Clone)]
pub struct ActivityReader {
    store: Arc<dyn AuditStore>,
}

impl ActivityReader {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// The full trail, ordered by `occurred_at` descending and then by id
    /// descending, so records stamped at the same instant come out
    /// newest-inserted first.
    pub async fn list_all(&self) -> Result<Vec<AuditRecord>, StorageError> {
        let mut records = self.store.scan_newest_first().await?;
        sort_newest_first(&mut records);
        Ok(records)
    }
}

pub(crate) fn sort_newest_first(records: &mut [AuditRecord]) {
    records.sort_by(|a, b| {
        b.occurred_at
            .cmp(&a.occurred_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// What a mutation handler wants written to the activity log.
///
/// Returned as a response part; it rides in the response extensions until
/// `record_activity` picks it up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub subject: String,
    pub action: String,
    pub actor_role: String,
}

impl Activity {
    pub fn new(
        subject: impl Into<String>,
        action: impl Into<String>,
        actor_role: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            action: action.into(),
            actor_role: actor_role.into(),
        }
    }

    /// Catalogue changes made from the admin console are attributed to "System".
    pub fn system(subject: impl Into<String>, action: impl Into<String>) -> Self {
        Self::new(subject, action, "System")
    }
}

impl IntoResponseParts for Activity {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.extensions_mut().insert(self);
        Ok(res)
    }
}
