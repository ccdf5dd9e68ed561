//! WebSocket connection handlers.
//!
//! 1 つのソケットにつき 1 つの ConnectionId を割り当て、受信したフレームを
//! `InboundEvent` に変換して EventDispatcher に渡します。ソケットが閉じたら
//! その接続の `disconnect` を処理します。

use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{FutureExt, sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, IdentityError, InboundEvent, UserId},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
    usecase::DispatchError,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub user_id: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let identity = match state
        .identity_resolver
        .resolve(query.user_id.as_deref())
        .await
    {
        Ok(identity) => identity,
        Err(IdentityError::Missing) => {
            tracing::info!("Rejected connection without user_id");
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(IdentityError::Invalid(e)) => {
            tracing::warn!("Rejected connection with invalid user_id: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, identity)))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound flow: events addressed to this connection (via rx channel)
/// are written to its WebSocket.
///
/// # Arguments
///
/// * `rx` - Channel receiver for encoded outbound frames
/// * `sender` - WebSocket sink to send frames to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, identity: Option<UserId>) {
    let connection = ConnectionIdFactory::generate();
    match &identity {
        Some(user) => tracing::info!("Connection '{}' opened as '{}'", connection, user),
        None => tracing::info!("Connection '{}' opened anonymously", connection),
    }

    // Create a channel for this connection to receive outbound frames
    let (tx, rx) = mpsc::unbounded_channel();
    state.message_pusher.register_connection(connection, tx).await;

    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let identity_clone = identity.clone();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on connection '{}': {}", connection, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text(&state_clone, connection, identity_clone.as_ref(), text.as_str())
                        .await;
                }
                Message::Binary(_) => {
                    tracing::debug!("Ignoring binary frame from connection '{}'", connection);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to write frames addressed to this connection
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    dispatch(&state, connection, identity.as_ref(), InboundEvent::Disconnect).await;
    tracing::info!("Connection '{}' closed", connection);
}

/// Parse one text frame and dispatch it. Malformed frames are dropped.
async fn handle_text(
    state: &AppState,
    connection: ConnectionId,
    identity: Option<&UserId>,
    text: &str,
) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Dropped unparsable frame from connection '{}': {}", connection, e);
            return;
        }
    };

    match InboundEvent::try_from(message) {
        Ok(event) => dispatch(state, connection, identity, event).await,
        Err(e) => {
            tracing::warn!("Dropped invalid event from connection '{}': {}", connection, e);
        }
    }
}

/// Dispatch one event. Failures and panics are logged and never end the connection.
async fn dispatch(
    state: &AppState,
    connection: ConnectionId,
    identity: Option<&UserId>,
    event: InboundEvent,
) {
    let name = event.name();
    let result = AssertUnwindSafe(state.dispatcher.dispatch(connection, identity, event))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(DispatchError::Internal(panic_message(panic.as_ref()))));

    match result {
        Ok(()) => {}
        Err(DispatchError::Validation(e)) => {
            tracing::warn!("Dropped '{}' from connection '{}': {}", name, connection, e);
        }
        Err(DispatchError::Authorization(e)) => {
            tracing::info!("Rejected '{}' from connection '{}': {:?}", name, connection, e);
        }
        Err(e @ (DispatchError::Storage(_) | DispatchError::Internal(_))) => {
            tracing::error!("'{}' from connection '{}' failed: {}", name, connection, e);
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic while handling event".to_string()
    }
}
