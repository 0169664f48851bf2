//! Lifecycle webhooks for managed transport.
//!
//! In managed mode the routing service holds the sockets and invokes these
//! endpoints once per connect, message, and disconnect, mirroring the
//! self-hosted socket loop. They are disabled when a local socket table is
//! in use.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::info;

use crate::state::AppState;

/// Connect payload forwarded by the routing service.
#[derive(Debug, Deserialize)]
pub struct ConnectPayload {
    /// Request headers of the original connect call.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// POST /hooks/connect/{connection_id}
pub async fn connect(
    State(state): State<AppState>,
    Path(connection_id): Path<String>,
    Json(payload): Json<ConnectPayload>,
) -> StatusCode {
    if state.local_gateway.is_some() {
        return StatusCode::NOT_FOUND;
    }
    match state
        .hub
        .engine
        .on_connect(&connection_id, &payload.headers)
        .await
    {
        Ok(()) => StatusCode::OK,
        Err(rejection) => {
            info!(
                connection_id,
                status = rejection.status_code,
                reason = %rejection.reason,
                "managed connect rejected"
            );
            StatusCode::from_u16(rejection.status_code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /hooks/message/{connection_id} — body is the raw text frame.
pub async fn message(
    State(state): State<AppState>,
    Path(connection_id): Path<String>,
    body: String,
) -> StatusCode {
    if state.local_gateway.is_some() {
        return StatusCode::NOT_FOUND;
    }
    state.hub.engine.on_message(&connection_id, &body).await;
    StatusCode::OK
}

/// POST /hooks/disconnect/{connection_id}
pub async fn disconnect(
    State(state): State<AppState>,
    Path(connection_id): Path<String>,
) -> StatusCode {
    if state.local_gateway.is_some() {
        return StatusCode::NOT_FOUND;
    }
    state.hub.engine.on_disconnect(&connection_id).await;
    StatusCode::OK
}
