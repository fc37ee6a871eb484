//! Message store contract
//!
//! The delivery router and the query services only see this trait. The MySQL
//! implementation backs production; the in-memory one backs tests and doubles
//! as the reference for the ordering semantics (`id` assigned at persistence,
//! `created_at` non-decreasing along `id`).

use crate::core::AppError;
use crate::entities::ChatMessage;
use async_trait::async_trait;

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persists a message and returns it with its assigned `id` and
    /// `created_at`. Fails with a validation error when `sender`, `receiver`
    /// or `body` is empty; nothing is written in that case.
    async fn append(
        &self,
        sender: &str,
        receiver: &str,
        body: &str,
        is_from_admin: bool,
    ) -> Result<ChatMessage, AppError>;

    /// Up to `limit` messages exchanged between `id_a` and `id_b` in either
    /// direction, newest first, optionally restricted to `id < before_id`.
    async fn find_between(
        &self,
        id_a: &str,
        id_b: &str,
        before_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, AppError>;

    /// Every message sent or received by `id`, in no particular order. Feeds
    /// the thread index aggregation.
    async fn find_all_involving(&self, id: &str) -> Result<Vec<ChatMessage>, AppError>;
}

/// Shared append precondition: all three fields must be non-empty after
/// trimming.
pub(super) fn check_append_fields(
    sender: &str,
    receiver: &str,
    body: &str,
) -> Result<(), AppError> {
    if sender.trim().is_empty() || receiver.trim().is_empty() || body.trim().is_empty() {
        return Err(AppError::bad_request(
            "sender, receiver and body are required",
        ));
    }
    Ok(())
}
