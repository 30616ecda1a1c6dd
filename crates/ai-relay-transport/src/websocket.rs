//! WebSocket endpoints for relay peers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use ai_relay_core::{ClientId, PeerHandle, RecvEvent, Relay, Role, run_session};

/// WebSocket handler state.
#[derive(Clone)]
pub struct WsState {
    /// Relay service shared by every connection.
    pub relay: Arc<Relay>,
}

/// Connection query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    /// Client identifier; defaults to the role name when absent.
    pub client_id: Option<String>,
}

impl ConnectParams {
    /// The id this connection registers under.
    ///
    /// Unidentified peers of a role share the role name as their id and
    /// therefore collide in the registry (last register wins).
    #[must_use]
    pub fn resolve(self, role: Role) -> ClientId {
        self.client_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| role.as_str().to_owned())
    }
}

/// Upgrade handler for `/ws/ai_server`.
pub async fn ai_server_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<WsState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, Role::AiServer, params))
}

/// Upgrade handler for `/ws/front`.
pub async fn front_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<WsState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, Role::Front, params))
}

async fn handle_socket(socket: WebSocket, state: WsState, role: Role, params: ConnectParams) {
    let client_id = params.resolve(role);
    let (mut sender, receiver) = socket.split();

    // Outbound channel: frames fanned out to this peer are queued here
    // and drained by the writer task.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let send_task = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound traffic, folded into tagged relay events. The relay loop
    // stops at the first Disconnected/Error it sees.
    let events = receiver.filter_map(|msg| async move {
        match msg {
            Ok(Message::Text(text)) => Some(RecvEvent::Frame(text.to_string())),
            Ok(Message::Binary(data)) => match String::from_utf8(data.to_vec()) {
                Ok(text) => Some(RecvEvent::Frame(text)),
                Err(_) => None,
            },
            Ok(Message::Close(_)) => Some(RecvEvent::Disconnected),
            Ok(_) => None,
            Err(e) => Some(RecvEvent::Error(e.to_string())),
        }
    });

    run_session(&state.relay, role, client_id, PeerHandle::new(tx), events).await;

    send_task.abort();
}

/// Create the relay WebSocket router.
///
/// # Example
/// ```ignore
/// let app = Router::new()
///     .merge(create_relay_router(relay));
/// ```
#[must_use]
pub fn create_relay_router(relay: Arc<Relay>) -> axum::Router {
    axum::Router::new()
        .route("/ws/ai_server", axum::routing::get(ai_server_handler))
        .route("/ws/front", axum::routing::get(front_handler))
        .with_state(WsState { relay })
}
