//! Analytics API handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::analytics::AnalyticsSnapshot;
use crate::models::RecordVisitRequest;

use super::handlers::AppState;

#[derive(Debug, Serialize)]
pub struct RecordVisitResponse {
    pub recorded: bool,
}

/// Record a page view.
///
/// Always answers 202: a visit that could not be stored is dropped, and the
/// page that reported it must not be affected.
pub async fn record_visit(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RecordVisitRequest>,
) -> (StatusCode, Json<RecordVisitResponse>) {
    let outcome = state.analytics.record_visit(&payload.path).await;
    (
        StatusCode::ACCEPTED,
        Json(RecordVisitResponse {
            recorded: outcome.is_recorded(),
        }),
    )
}

/// Current analytics snapshot. Fields whose store reads failed come back zeroed.
pub async fn get_snapshot(State(state): State<Arc<AppState>>) -> Json<AnalyticsSnapshot> {
    Json(state.analytics.snapshot().await)
}
