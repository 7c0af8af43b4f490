//! Visit analytics
//!
//! Page views are recorded one row at a time into the configured record
//! store. Snapshots are computed on demand: two counts plus one fetch of the
//! trailing seven-day window, which is then bucketed per day and ranked by
//! page path in memory.

pub mod aggregator;
pub mod models;
pub mod service;

pub use aggregator::{TrailingWindow, TOP_PAGES_LIMIT, WINDOW_DAYS};
pub use models::{AnalyticsSnapshot, DailyBucket, PageRanking, RecordOutcome};
pub use service::AnalyticsService;
