//! In-process transfer store, used by tests and default wiring.
//!
//! The production deployment keeps records in an external database behind
//! the same [`TransferStore`] trait.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;

use super::{TransferRecord, TransferStatus, TransferStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<TransferRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<TransferRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Query("store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl TransferStore for MemoryStore {
    async fn insert(&self, record: &TransferRecord) -> Result<(), StoreError> {
        self.lock()?.push(record.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: TransferStatus,
        verification_link: Option<String>,
    ) -> Result<(), StoreError> {
        let mut records = self.lock()?;
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(StoreError::NotFound { id })?;

        record.status = status;
        if verification_link.is_some() {
            record.verification_link = verification_link;
        }
        Ok(())
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<TransferRecord>, StoreError> {
        Ok(self.lock()?.iter().find(|record| record.id == id).cloned())
    }

    async fn by_wallet(&self, address: &str) -> Result<Vec<TransferRecord>, StoreError> {
        let mut matches: Vec<TransferRecord> = self
            .lock()?
            .iter()
            .filter(|record| record.sender == address || record.receiver == address)
            .cloned()
            .collect();
        // Newest first; ties resolve to the later insertion.
        matches.reverse();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }
}
