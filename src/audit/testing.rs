use std::sync::Mutex;

use async_trait::async_trait;

use super::{AuditStore, StorageError};
use crate::models::{AuditRecord, NewAuditRecord};

/// Vec-backed store; ids are handed out in insertion order starting at 1.
pub(crate) struct MemoryAuditStore {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditStore {
    pub(crate) fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn insert(&self, record: NewAuditRecord) -> Result<AuditRecord, StorageError> {
        let mut records = self.records.lock().unwrap();
        let stored = record.with_id(records.len() as i64 + 1);
        records.push(stored.clone());
        Ok(stored)
    }

    async fn scan_newest_first(&self) -> Result<Vec<AuditRecord>, StorageError> {
        let mut records = self.snapshot();
        records.reverse();
        Ok(records)
    }
}

pub(crate) struct FailingAuditStore;

#[async_trait]
impl AuditStore for FailingAuditStore {
    async fn insert(&self, _record: NewAuditRecord) -> Result<AuditRecord, StorageError> {
        Err(StorageError::Unavailable("audit table offline".to_string()))
    }

    async fn scan_newest_first(&self) -> Result<Vec<AuditRecord>, StorageError> {
        Err(StorageError::Unavailable("audit table offline".to_string()))
    }
}
