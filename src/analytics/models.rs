//! Data models for visit analytics

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Visit count for one calendar day of the trailing window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBucket {
    /// Calendar day (UTC), serialized as `YYYY-MM-DD`
    pub date: NaiveDate,

    /// Short display label, e.g. "Oct 17"
    pub label: String,

    pub count: u64,
}

/// Visit count for one page path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRanking {
    pub path: String,
    pub count: u64,
}

/// Result of one aggregation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_visits: u64,
    pub today_visits: u64,
    /// Exactly one bucket per day of the window, oldest first
    pub weekly_visits: Vec<DailyBucket>,
    /// At most five entries, most visited first
    pub top_pages: Vec<PageRanking>,
}

/// What happened to a best-effort visit write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    Dropped,
}

impl RecordOutcome {
    pub fn is_recorded(self) -> bool {
        matches!(self, RecordOutcome::Recorded)
    }
}
