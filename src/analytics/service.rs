//! Best-effort visit recording and snapshot assembly
//!
//! Neither operation ever fails towards the caller. Store errors are
//! logged and degrade only the field they affect.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::analytics::aggregator::{daily_buckets, top_pages, TrailingWindow};
use crate::analytics::models::{AnalyticsSnapshot, RecordOutcome};
use crate::storage::VisitStore;

pub struct AnalyticsService {
    store: Arc<dyn VisitStore>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn VisitStore>) -> Self {
        Self { store }
    }

    /// Record one page view. Failed writes are logged and dropped, never retried.
    pub async fn record_visit(&self, path: &str) -> RecordOutcome {
        match self.store.insert_visit(path).await {
            Ok(()) => {
                debug!(path, "Recorded visit");
                RecordOutcome::Recorded
            }
            Err(e) => {
                warn!(path, error = %e, "Dropping visit record");
                RecordOutcome::Dropped
            }
        }
    }

    /// Aggregate the current snapshot
    pub async fn snapshot(&self) -> AnalyticsSnapshot {
        self.snapshot_at(Utc::now()).await
    }

    /// Aggregate the snapshot as seen at `now`
    pub async fn snapshot_at(&self, now: DateTime<Utc>) -> AnalyticsSnapshot {
        let window = TrailingWindow::ending_at(now);

        let (total, today, rows) = tokio::join!(
            self.store.count_visits(None),
            self.store.count_visits(Some(window.today_start())),
            self.store.fetch_visits(window.start(), window.end()),
        );

        let total_visits = total.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to count total visits");
            0
        });

        let today_visits = today.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to count today's visits");
            0
        });

        let rows = rows.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to fetch visits for the trailing window");
            Vec::new()
        });

        AnalyticsSnapshot {
            total_visits,
            today_visits,
            weekly_visits: daily_buckets(&rows, &window),
            top_pages: top_pages(&rows),
        }
    }
}
