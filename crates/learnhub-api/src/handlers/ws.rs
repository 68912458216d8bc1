//! WebSocket upgrade handler.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use learnhub_core::error::AppError;

use crate::error::ApiError;
use learnhub_realtime::connection::authenticator::{AuthenticatedConnection, WsAuthenticator};

use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: String,
}

/// GET /ws?token={jwt} — WebSocket upgrade
///
/// Authentication happens before the upgrade: a bad or missing token is
/// rejected with a plain HTTP error and no socket is ever established.
pub async fn ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    let authenticator = WsAuthenticator::new(state.jwt_decoder.clone());
    let timeout = Duration::from_secs(state.config.realtime.auth_timeout_seconds);

    let auth = tokio::time::timeout(timeout, authenticator.authenticate(&query.token))
        .await
        .map_err(|_| AppError::authentication("Handshake authentication timed out"))??;

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(state, auth, socket)))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, auth: AuthenticatedConnection, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) =
        state
            .realtime
            .connections
            .register(auth.user_id, auth.role.clone(), auth.username.clone());

    let conn_id = handle.id;

    info!(
        conn_id = %conn_id,
        user_id = %auth.user_id,
        "WebSocket connection established"
    );

    // Forward queued outbound messages as JSON text frames.
    let outbound_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(t) => t,
                Err(e) => {
                    warn!(conn_id = %conn_id, error = %e, "Failed to serialize outbound frame");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                state
                    .realtime
                    .connections
                    .handle_inbound(&conn_id, &text, &state.notification_service)
                    .await;
            }
            Ok(Message::Close(_)) => {
                break;
            }
            // Ping/pong is handled by axum automatically.
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
        user_id = %auth.user_id,
        "WebSocket connection closed"
    );
}
