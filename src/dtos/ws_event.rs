//! WebSocket event DTOs - tagged unions for the live protocol
//!
//! Serialized as `{ "event": "...", "data": { ... } }` in both directions.

use super::{ChatMessageDTO, SendMessageDTO};
use serde::{Deserialize, Serialize};

/// Events a client may emit on its connection.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Declare room membership. By convention each identity joins the single
    /// room named after its own identifier right after connecting.
    Join { room: String },
    /// Submit a message for persistence and live delivery.
    Send(SendMessageDTO),
}

/// Events the server pushes down a connection.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A message addressed to a room this connection has joined. Never sent
    /// to the connection the message originated from.
    Receive(ChatMessageDTO),
    /// Acknowledgement of a persisted message, sent to the originating
    /// connection only.
    Sent(ChatMessageDTO),
    /// A send failed; reported to the originating connection only.
    Error { message: String },
}
