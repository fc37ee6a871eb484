//! Message DTOs - wire representations of chat messages

use crate::entities::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Message as seen by clients, both in history pages and in live
/// `receive`/`sent` events. The read-receipt flag stays internal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessageDTO {
    pub id: i64,
    pub sender: String,
    pub receiver: String,
    pub body: String,
    pub is_from_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessage> for ChatMessageDTO {
    fn from(value: ChatMessage) -> Self {
        Self {
            id: value.id,
            sender: value.sender,
            receiver: value.receiver,
            body: value.body,
            is_from_admin: value.is_from_admin,
            created_at: value.created_at,
        }
    }
}

/// Payload of the live `send` event.
///
/// `sender_id` and `is_from_admin` are only honored when the connection is
/// anonymous; an authenticated connection derives both from its attached
/// identity.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SendMessageDTO {
    pub receiver_id: String,

    #[validate(length(
        min = 1,
        max = 5000,
        message = "Message body must be between 1 and 5000 characters"
    ))]
    pub body: String,

    #[serde(default)]
    pub sender_id: Option<String>,

    #[serde(default)]
    pub is_from_admin: Option<bool>,
}
