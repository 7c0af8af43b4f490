use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::analytics::AnalyticsService;
use crate::ui::{NewToast, Toast, UiState};

pub struct AppState {
    pub analytics: Arc<AnalyticsService>,
    pub ui: UiState,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct CreatedToastResponse {
    pub id: String,
}

/// List toasts currently shown
pub async fn list_toasts(State(state): State<Arc<AppState>>) -> Json<Vec<Toast>> {
    Json(state.ui.toasts.list().await)
}

/// Show a new toast
pub async fn create_toast(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewToast>,
) -> Result<(StatusCode, Json<CreatedToastResponse>), (StatusCode, Json<ErrorResponse>)> {
    if payload.title.is_none() && payload.description.is_none() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Toast needs a title or a description".to_string(),
            }),
        ));
    }

    let id = state.ui.toasts.push(payload).await;
    Ok((StatusCode::CREATED, Json(CreatedToastResponse { id })))
}

/// Dismiss a toast
pub async fn dismiss_toast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    if state.ui.toasts.dismiss(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Toast not found".to_string(),
            }),
        ))
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}
