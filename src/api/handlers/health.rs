use axum::{extract::State, http::StatusCode};

use crate::AppState;

/// Liveness probe: runs a trivial query against the store.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DB down"),
    }
}
