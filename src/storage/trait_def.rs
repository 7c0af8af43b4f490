use crate::models::VisitRow;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// The record store could not serve a request.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("record store is not configured")]
    NotConfigured,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("record store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed record store response: {0}")]
    Malformed(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[async_trait]
pub trait VisitStore: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn init(&self) -> Result<()>;

    /// Append one visit event; the store assigns id and timestamp
    async fn insert_visit(&self, page_path: &str) -> StorageResult<()>;

    /// Count visit events, optionally only those created at or after `since`
    async fn count_visits(&self, since: Option<DateTime<Utc>>) -> StorageResult<u64>;

    /// Fetch visit events with `start <= created_at < end`, oldest first
    async fn fetch_visits(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Vec<VisitRow>>;
}
