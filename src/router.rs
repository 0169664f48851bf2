//! Route table.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};

use crate::hooks;
use crate::state::AppState;
use crate::ws;

/// Builds the gateway's HTTP surface.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/hooks/connect/{connection_id}", post(hooks::connect))
        .route("/hooks/message/{connection_id}", post(hooks::message))
        .route("/hooks/disconnect/{connection_id}", post(hooks::disconnect))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz(State(state): State<AppState>) -> StatusCode {
    match state.kv.health_check().await {
        Ok(true) => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    }
}
