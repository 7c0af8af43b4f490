use crate::models::VisitRow;
use crate::storage::{StorageError, StorageResult, VisitStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Stand-in used when no record store is configured.
///
/// Reads answer as if the store were empty; inserts fail with
/// [`StorageError::NotConfigured`] so the recorder logs and drops them.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledStore;

#[async_trait]
impl VisitStore for DisabledStore {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_visit(&self, _page_path: &str) -> StorageResult<()> {
        Err(StorageError::NotConfigured)
    }

    async fn count_visits(&self, _since: Option<DateTime<Utc>>) -> StorageResult<u64> {
        Ok(0)
    }

    async fn fetch_visits(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> StorageResult<Vec<VisitRow>> {
        Ok(Vec::new())
    }
}
