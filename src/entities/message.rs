//! Message entity - one persisted chat message

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A row of the append-only message log. Immutable once created; nothing in
/// this service updates or deletes messages.
///
/// `id` is assigned by the store at persistence time and grows monotonically
/// with creation order, so it doubles as the pagination cursor. `created_at`
/// is non-decreasing along `id`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ChatMessage {
    pub id: i64,
    pub sender: String,
    pub receiver: String,
    pub body: String,
    pub is_from_admin: bool,
    /// Reserved for read receipts; stored but consulted by nothing yet.
    #[sqlx(rename = "is_read")]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// The other party of this message from `viewer`'s point of view.
    pub fn counterparty_of(&self, viewer: &str) -> &str {
        if self.sender == viewer {
            &self.receiver
        } else {
            &self.sender
        }
    }
}
