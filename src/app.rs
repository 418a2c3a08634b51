use crate::handlers;
use crate::state::AppState;
use axum::{http::StatusCode, routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/quick-add", get(handlers::quick_add))
        .route("/api/today", get(handlers::get_today))
        .route("/api/log", post(handlers::log))
        .route("/api/reset-day", post(handlers::reset_day))
        .route("/api/view", get(handlers::get_view))
        .route("/api/period", post(handlers::set_period))
        .route("/api/navigate", post(handlers::navigate))
        .route("/api/settings", post(handlers::update_settings))
        .route("/api/export", get(handlers::export))
        .route("/api/import", post(handlers::import))
        .route("/api/clear", post(handlers::clear))
        .with_state(state)
}

/// Served when setup could not complete even after recovery.
pub fn fallback_router() -> Router {
    Router::new().fallback(|| async {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "The tracker failed to start. Please refresh.",
        )
    })
}
