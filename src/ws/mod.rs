//! WebSocket module - live delivery of chat messages
//!
//! Upgrade handling, per-connection reader/writer tasks, the room registry
//! and the delivery router.

pub mod connection;
pub mod events;
pub mod registry;

pub use connection::handle_socket;
pub use registry::{ConnId, RoomRegistry};

use crate::AppState;
use crate::core::auth::resolve_connection_identity;
use axum::{
    extract::{Query, State, ws::WebSocketUpgrade},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Connections silent for this long are dropped; clients are expected to
/// keep the socket warm with pings.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Deserialize)]
pub struct WsConnectQuery {
    #[serde(default)]
    token: Option<String>,
}

/// Entry point for WebSocket upgrade requests. Authentication is optional
/// here: a valid token attaches the connection to its identity, anything
/// else yields an anonymous connection.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<WsConnectQuery>,
) -> Response {
    let identity =
        resolve_connection_identity(&headers, params.token.as_deref(), &state.jwt_secret);

    ws.on_upgrade(move |socket| handle_socket(socket, state, identity))
}
