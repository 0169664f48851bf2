//! WebSocket upgrade handler for self-hosted transport.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use votelive_realtime::RealtimeHub;
use votelive_realtime::gateway::{Frame, LocalGateway};

use crate::state::AppState;

/// GET /ws — WebSocket upgrade.
///
/// The connection is accepted or rejected before the upgrade completes, so
/// a missing cookie jar turns into a plain HTTP 401.
pub async fn ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    headers: HeaderMap,
) -> Response {
    let Some(gateway) = state.local_gateway.clone() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let connection_id = Uuid::new_v4().to_string();
    let header_map = flatten_headers(&headers);

    match state.hub.engine.on_connect(&connection_id, &header_map).await {
        Ok(()) => {
            let hub = state.hub.clone();
            let heartbeat = state.heartbeat_interval;
            ws.on_upgrade(move |socket| {
                handle_socket(hub, gateway, connection_id, heartbeat, socket)
            })
        }
        Err(rejection) => {
            info!(
                connection_id,
                status = rejection.status_code,
                reason = %rejection.reason,
                "connection rejected"
            );
            StatusCode::from_u16(rejection.status_code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response()
        }
    }
}

fn flatten_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            Some((name.as_str().to_string(), value.to_str().ok()?.to_string()))
        })
        .collect()
}

async fn handle_socket(
    hub: Arc<RealtimeHub>,
    gateway: Arc<LocalGateway>,
    connection_id: String,
    heartbeat: Duration,
    socket: WebSocket,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut outbound_rx = gateway.register(&connection_id);

    info!(connection_id, "websocket established");

    // Drains the outbound channel and keeps the socket alive with
    // protocol-level pings.
    let writer_id = connection_id.clone();
    let writer = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(heartbeat);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                frame = outbound_rx.recv() => match frame {
                    Some(Frame::Text(text)) => {
                        if ws_tx.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    Some(Frame::Close) => {
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                    None => break,
                },
                _ = ticker.tick() => {
                    if ws_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                        debug!(connection_id = %writer_id, "ping failed, socket gone");
                        break;
                    }
                }
            }
        }
    });

    // Inbound frames are processed one at a time per connection; frames
    // from other connections interleave freely.
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                hub.engine.on_message(&connection_id, text.as_str()).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(connection_id, error = %e, "websocket read error");
                break;
            }
        }
    }

    writer.abort();
    gateway.deregister(&connection_id);
    hub.engine.on_disconnect(&connection_id).await;

    info!(connection_id, "websocket closed");
}
