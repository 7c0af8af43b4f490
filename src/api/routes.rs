use axum::{
    http::HeaderValue,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::analytics::AnalyticsService;
use crate::config::CorsConfig;
use crate::ui::UiState;

use super::analytics::{get_snapshot, record_visit};
use super::handlers::{create_toast, dismiss_toast, health_check, list_toasts, AppState};

pub fn create_api_router(
    analytics: Arc<AnalyticsService>,
    ui: UiState,
    cors: &CorsConfig,
) -> Router {
    let state = Arc::new(AppState { analytics, ui });

    let api_routes = Router::new()
        .route("/visits", post(record_visit))
        .route("/analytics", get(get_snapshot))
        .route("/toasts", get(list_toasts).post(create_toast))
        .route("/toasts/{id}", delete(dismiss_toast))
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(cors_layer(cors))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
