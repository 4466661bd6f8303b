//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Application routes are owned elsewhere; this router carries the health
//! probe that reports datastore reachability, plus HTTP tracing.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthBody {
    pub status: &'static str,
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// `GET /health`: 200 when the datastore answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthBody>) {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (StatusCode::OK, Json(HealthBody { status: "ok" })),
        Err(e) => {
            warn!(error = %e, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(HealthBody { status: "unavailable" }))
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
