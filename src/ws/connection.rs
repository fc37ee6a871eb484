//! WebSocket connection lifecycle
//!
//! Each accepted socket is split into a reader and a writer task. The writer
//! drains the connection's unbounded event channel; the reader parses client
//! events and dispatches them. Dropping the registry entry on disconnect
//! closes the channel, which in turn ends the writer.

use crate::core::AppState;
use crate::dtos::{ClientEvent, ServerEvent};
use crate::entities::Identity;
use crate::ws::IDLE_TIMEOUT;
use crate::ws::events::handle_send;
use crate::ws::registry::ConnId;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

#[instrument(skip(ws, state), fields(identity = ?identity))]
pub async fn handle_socket(ws: WebSocket, state: Arc<AppState>, identity: Option<Identity>) {
    info!("WebSocket connection established");

    let (ws_tx, ws_rx) = ws.split();
    let (event_tx, event_rx) = unbounded_channel::<ServerEvent>();

    let conn_id = state.registry.attach(event_tx, identity);

    tokio::spawn(write_ws(conn_id, ws_tx, event_rx));
    listen_ws(conn_id, ws_rx, state).await;
}

/// Forwards routed events to the socket as JSON text frames.
#[instrument(skip(websocket_tx, event_rx))]
async fn write_ws(
    conn_id: ConnId,
    mut websocket_tx: SplitSink<WebSocket, Message>,
    mut event_rx: UnboundedReceiver<ServerEvent>,
) {
    while let Some(event) = event_rx.recv().await {
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(e) => {
                warn!(conn_id, "failed to serialize event: {e}");
                continue;
            }
        };
        if let Err(e) = websocket_tx.send(Message::Text(Utf8Bytes::from(json))).await {
            warn!(conn_id, "socket write failed, stopping writer: {e}");
            break;
        }
    }
    info!(conn_id, "write task terminated");
}

/// Reads client events until the peer disconnects, errors out or goes idle
/// past [`IDLE_TIMEOUT`], then detaches the connection.
#[instrument(skip(websocket_rx, state))]
async fn listen_ws(conn_id: ConnId, mut websocket_rx: SplitStream<WebSocket>, state: Arc<AppState>) {
    loop {
        match timeout(IDLE_TIMEOUT, websocket_rx.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => {
                dispatch_event(&state, conn_id, &text).await;
            }
            Ok(Some(Ok(Message::Close(_)))) => {
                info!(conn_id, "close frame received");
                break;
            }
            Ok(Some(Ok(_))) => {} // ping/pong/binary, nothing to do
            Ok(Some(Err(e))) => {
                warn!(conn_id, "WebSocket error: {e}");
                break;
            }
            Ok(None) => {
                info!(conn_id, "stream ended");
                break;
            }
            Err(_) => {
                warn!(conn_id, "idle timeout, dropping connection");
                break;
            }
        }
    }

    state.registry.detach(conn_id);
    info!(conn_id, "listen task terminated");
}

async fn dispatch_event(state: &Arc<AppState>, conn_id: ConnId, text: &str) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::Join { room }) => {
            if room.trim().is_empty() {
                debug!(conn_id, "join with empty room ignored");
                return;
            }
            state.registry.join(conn_id, &room);
        }
        Ok(ClientEvent::Send(payload)) => {
            handle_send(state, conn_id, payload).await;
        }
        Err(e) => {
            warn!(conn_id, "unrecognized client event: {e}");
            state.registry.send_to(
                conn_id,
                ServerEvent::Error {
                    message: "Unrecognized event".to_string(),
                },
            );
        }
    }
}
