mod chat;
mod lifecycle;

use axum::{
    extract::{Query, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::HeaderMap,
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use archlink_shared::constants::WS_HEARTBEAT_INTERVAL_MS;

use crate::AppState;
use crate::error::AppError;
use crate::middleware::auth::{resolve_session, token_from_headers};
use crate::models::AuthUser;
use crate::ws::events::{ClientEvent, ServerEvent};
use crate::ws::gateway::{ClientId, Topic};

/// WebSocket upgrade handler. The session comes from `?token=`, a bearer
/// header or the session cookie, in that order.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let token = query
        .get("token")
        .filter(|t| !t.is_empty())
        .cloned()
        .or_else(|| token_from_headers(&headers))
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

    let user = resolve_session(&state.db, &token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".into()))?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user: AuthUser) {
    let client_id = state.gateway.next_client_id().await;
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    state.gateway.register(client_id, user.id.clone(), tx).await;
    lifecycle::on_connect(&state, client_id, &user).await;

    let cancel = CancellationToken::new();

    // Forward queued events to the socket, with a periodic ping
    let send_cancel = cancel.clone();
    let mut send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(Duration::from_millis(WS_HEARTBEAT_INTERVAL_MS));
        heartbeat.tick().await;
        loop {
            tokio::select! {
                _ = send_cancel.cancelled() => break,
                _ = heartbeat.tick() => {
                    if ws_tx.send(Message::Ping(Default::default())).await.is_err() {
                        break;
                    }
                }
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    if ws_tx.send(Message::Text(msg.into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    let recv_state = state.clone();
    let recv_user = user.clone();
    let recv_cancel = cancel.clone();
    let mut recv_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                _ = recv_cancel.cancelled() => break,
                msg = ws_rx.next() => msg,
            };
            match msg {
                Some(Ok(Message::Text(text))) => {
                    let text_str: &str = &text;
                    match serde_json::from_str::<ClientEvent>(text_str) {
                        Ok(event) => {
                            handle_client_event(&recv_state, client_id, &recv_user, event).await;
                        }
                        Err(e) => {
                            tracing::debug!(client = client_id, error = %e, "Unparseable client event");
                            recv_state
                                .gateway
                                .send_to(
                                    client_id,
                                    &ServerEvent::Error {
                                        message: "Invalid event".into(),
                                    },
                                )
                                .await;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {},
        _ = &mut recv_task => {},
    }
    cancel.cancel();
    send_task.abort();
    recv_task.abort();

    lifecycle::on_disconnect(&state, client_id, &user).await;
}

async fn handle_client_event(
    state: &AppState,
    client_id: ClientId,
    user: &AuthUser,
    event: ClientEvent,
) {
    let result = match event {
        ClientEvent::Subscribe { kind, key } => {
            chat::handle_subscribe(state, client_id, user, Topic::new(kind, key)).await
        }
        ClientEvent::Unsubscribe { kind, key } => {
            chat::handle_unsubscribe(state, client_id, Topic::new(kind, key)).await
        }
        ClientEvent::SendMessage { conversation_id, content } => {
            chat::handle_send_message(state, user, &conversation_id, &content).await
        }
        ClientEvent::MarkRead { conversation_id } => {
            chat::handle_mark_read(state, user, &conversation_id).await
        }
        ClientEvent::Ping => {
            state.gateway.send_to(client_id, &ServerEvent::Pong).await;
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::debug!(client = client_id, user = %user.id, error = %e, "Gateway event failed");
        state
            .gateway
            .send_to(
                client_id,
                &ServerEvent::Error {
                    message: e.public_message(),
                },
            )
            .await;
    }
}
