//! MemoryMessageStore - in-process message store
//!
//! Same contract as the MySQL repository, kept in a mutex-guarded vector.
//! Used by the test suite and by anything that needs the store semantics
//! without a database.

use super::traits::{MessageStore, check_append_fields};
use crate::core::AppError;
use crate::entities::ChatMessage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

#[derive(Default)]
struct Log {
    next_id: i64,
    last_created_at: Option<DateTime<Utc>>,
    messages: Vec<ChatMessage>,
}

#[derive(Default)]
pub struct MemoryMessageStore {
    inner: Mutex<Log>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn append(
        &self,
        sender: &str,
        receiver: &str,
        body: &str,
        is_from_admin: bool,
    ) -> Result<ChatMessage, AppError> {
        check_append_fields(sender, receiver, body)?;

        let mut log = self.inner.lock().expect("message log poisoned");
        log.next_id += 1;

        // Clamp against the previous timestamp so created_at never decreases
        // along id, even if the wall clock steps backwards.
        let mut created_at = Utc::now();
        if let Some(last) = log.last_created_at {
            created_at = created_at.max(last);
        }
        log.last_created_at = Some(created_at);

        let message = ChatMessage {
            id: log.next_id,
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            body: body.to_string(),
            is_from_admin,
            read: false,
            created_at,
        };
        log.messages.push(message.clone());
        Ok(message)
    }

    async fn find_between(
        &self,
        id_a: &str,
        id_b: &str,
        before_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, AppError> {
        let log = self.inner.lock().expect("message log poisoned");
        let mut matched: Vec<ChatMessage> = log
            .messages
            .iter()
            .filter(|m| {
                (m.sender == id_a && m.receiver == id_b)
                    || (m.sender == id_b && m.receiver == id_a)
            })
            .filter(|m| before_id.is_none_or(|before| m.id < before))
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.id.cmp(&a.id));
        matched.truncate(limit.max(0) as usize);
        Ok(matched)
    }

    async fn find_all_involving(&self, id: &str) -> Result<Vec<ChatMessage>, AppError> {
        let log = self.inner.lock().expect("message log poisoned");
        Ok(log
            .messages
            .iter()
            .filter(|m| m.sender == id || m.receiver == id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_then_query_contains_message() {
        let store = MemoryMessageStore::new();
        let saved = store.append("u1", "admin", "hello", false).await.unwrap();

        let found = store.find_between("u1", "admin", None, 10).await.unwrap();
        assert_eq!(found, vec![saved]);
    }

    #[tokio::test]
    async fn append_rejects_empty_fields() {
        let store = MemoryMessageStore::new();

        assert!(store.append("", "admin", "hi", false).await.is_err());
        assert!(store.append("u1", "", "hi", false).await.is_err());
        assert!(store.append("u1", "admin", "  ", false).await.is_err());

        let all = store.find_all_involving("admin").await.unwrap();
        assert!(all.is_empty(), "failed appends must not persist anything");
    }

    #[tokio::test]
    async fn ids_are_monotone_and_timestamps_non_decreasing() {
        let store = MemoryMessageStore::new();
        for i in 0..5 {
            store
                .append("u1", "admin", &format!("msg {i}"), false)
                .await
                .unwrap();
        }

        let newest_first = store.find_between("u1", "admin", None, 10).await.unwrap();
        for pair in newest_first.windows(2) {
            assert!(pair[0].id > pair[1].id);
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn find_between_matches_both_directions_and_respects_cursor() {
        let store = MemoryMessageStore::new();
        store.append("u1", "admin", "from user", false).await.unwrap();
        store.append("admin", "u1", "from admin", true).await.unwrap();
        store.append("u2", "admin", "other thread", false).await.unwrap();

        let pair = store.find_between("u1", "admin", None, 10).await.unwrap();
        assert_eq!(pair.len(), 2);
        assert_eq!(pair[0].body, "from admin");

        let older = store.find_between("u1", "admin", Some(2), 10).await.unwrap();
        assert_eq!(older.len(), 1);
        assert_eq!(older[0].body, "from user");
    }

    #[tokio::test]
    async fn find_all_involving_covers_sent_and_received() {
        let store = MemoryMessageStore::new();
        store.append("u1", "admin", "a", false).await.unwrap();
        store.append("admin", "u2", "b", true).await.unwrap();
        store.append("u1", "u3", "c", false).await.unwrap();

        let involving_admin = store.find_all_involving("admin").await.unwrap();
        assert_eq!(involving_admin.len(), 2);
    }
}
