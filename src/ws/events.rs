//! Delivery router - validate, persist, fan out, acknowledge
//!
//! One invocation per inbound `send` event. Failures never cross a
//! connection boundary: whatever goes wrong is reported as an `error` event
//! to the originating connection only.

use crate::core::{AppError, AppState};
use crate::dtos::{ChatMessageDTO, SendMessageDTO, ServerEvent};
use crate::entities::Identity;
use crate::ws::registry::ConnId;
use tracing::{info, instrument, warn};
use validator::Validate;

/// Handles one `send` from `conn_id`.
///
/// The sender is the connection's attached identity; only an anonymous
/// connection may supply `sender_id` (and `is_from_admin`) itself. The
/// message is persisted before any fan-out, so a receiver with no live
/// connection still finds it in history. The originating connection never
/// receives its own message as a `receive` event, even when it has joined
/// the receiver's room; it gets a single `sent` acknowledgement instead.
#[instrument(skip(state, payload), fields(conn_id))]
pub async fn handle_send(state: &AppState, conn_id: ConnId, payload: SendMessageDTO) {
    match route_message(state, conn_id, payload).await {
        Ok(message) => {
            let delivered =
                state
                    .registry
                    .emit_to_room(&message.receiver, Some(conn_id), &ServerEvent::Receive(message.clone()));
            info!(
                sender = %message.sender,
                receiver = %message.receiver,
                delivered,
                "message routed"
            );
            state.registry.send_to(conn_id, ServerEvent::Sent(message));
        }
        Err(err) => {
            warn!(conn_id, error = err.message(), "send failed");
            state.registry.send_to(
                conn_id,
                ServerEvent::Error {
                    message: err.message().to_string(),
                },
            );
        }
    }
}

/// Validation and persistence; fan-out stays in the caller so a persistence
/// failure can never be followed by delivery.
async fn route_message(
    state: &AppState,
    conn_id: ConnId,
    payload: SendMessageDTO,
) -> Result<ChatMessageDTO, AppError> {
    let identity = state.registry.identity_of(conn_id);

    let sender = match &identity {
        Some(id) => id.as_str().to_string(),
        None => payload.sender_id.clone().unwrap_or_default(),
    };
    let is_from_admin = match &identity {
        Some(Identity::Admin) => true,
        Some(Identity::User(_)) => false,
        None => payload.is_from_admin.unwrap_or(false),
    };

    if sender.trim().is_empty()
        || payload.receiver_id.trim().is_empty()
        || payload.body.trim().is_empty()
    {
        return Err(AppError::bad_request("Missing fields in send"));
    }
    payload.validate()?;

    let saved = state
        .store
        .append(&sender, &payload.receiver_id, &payload.body, is_from_admin)
        .await
        .map_err(|err| {
            warn!(error = err.message(), "message persistence failed");
            AppError::internal_server_error("Message failed to send")
        })?;

    Ok(ChatMessageDTO::from(saved))
}
