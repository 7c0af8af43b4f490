use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded page view as returned by a window fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRow {
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub page_path: Option<String>,
}

impl VisitRow {
    pub fn new(created_at: DateTime<Utc>, page_path: impl Into<String>) -> Self {
        Self {
            created_at,
            page_path: Some(page_path.into()),
        }
    }

    /// Build a row from the millisecond timestamp the SQL stores keep.
    pub fn from_millis(created_at_ms: i64, page_path: Option<String>) -> Option<Self> {
        DateTime::from_timestamp_millis(created_at_ms).map(|created_at| Self {
            created_at,
            page_path,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordVisitRequest {
    pub path: String,
}
