//! WebSocket upgrade handler and per-connection socket loop.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{info, warn};

use learnhub_core::error::AppError;
use learnhub_core::types::id::UserId;
use learnhub_realtime::message::OutboundMessage;
use learnhub_service::RequestContext;

use crate::state::AppState;

/// Query parameters for WebSocket authentication.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Provider-issued access token.
    pub token: String,
}

/// GET /ws?token={jwt}
///
/// The token is validated before the upgrade so bad credentials fail with a
/// plain HTTP error instead of an immediately-closed socket.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, AppError> {
    let ctx = state.token_verifier.context_from_token(&query.token)?;
    Ok(ws.on_upgrade(move |socket| handle_socket(state, ctx, socket)))
}

/// Drives one WebSocket connection until either side closes it.
async fn handle_socket(state: AppState, ctx: RequestContext, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state
        .realtime
        .connections
        .register(UserId::from_uuid(ctx.user_id));
    let conn_id = handle.id;

    info!(
        conn_id = %conn_id,
        user_id = %ctx.user_id,
        "WebSocket connection established"
    );

    let ping_seconds = state.realtime.config.ping_interval_seconds;
    let mut shutdown_rx = state.realtime.shutdown_receiver();
    let pump_handle = Arc::clone(&handle);

    // Outbound pump: queued frames, keepalive pings, shutdown close.
    let outbound_task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(ping_seconds));
        loop {
            tokio::select! {
                maybe = outbound_rx.recv() => {
                    let Some(msg) = maybe else { break };
                    let Ok(json) = serde_json::to_string(&msg) else { continue };
                    if ws_tx.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if !pump_handle.is_alive() {
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                    // A client that missed two ping windows is gone.
                    let last_pong = pump_handle.last_pong_at().await;
                    let silence = Utc::now() - last_pong;
                    if silence > chrono::Duration::seconds(2 * ping_seconds as i64) {
                        warn!(conn_id = %pump_handle.id, "WebSocket stale, closing");
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                    let ping = OutboundMessage::Ping {
                        timestamp: Utc::now().timestamp_millis(),
                    };
                    let Ok(json) = serde_json::to_string(&ping) else { continue };
                    if ws_tx.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                _ = shutdown_rx.recv() => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    // Inbound loop on this task.
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                state
                    .realtime
                    .connections
                    .handle_inbound(&conn_id, &text)
                    .await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound_task.abort();
    state.realtime.connections.unregister(&conn_id);

    info!(
        conn_id = %conn_id,
        user_id = %ctx.user_id,
        "WebSocket connection closed"
    );
}
