//! MessageRepository - MySQL-backed message store

use super::traits::{MessageStore, check_append_fields};
use crate::core::AppError;
use crate::entities::ChatMessage;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::MySqlPool;

const SELECT_COLUMNS: &str = "id, sender, receiver, body, is_from_admin, is_read, created_at";

pub struct MessageRepository {
    connection_pool: MySqlPool,
}

impl MessageRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn append(
        &self,
        sender: &str,
        receiver: &str,
        body: &str,
        is_from_admin: bool,
    ) -> Result<ChatMessage, AppError> {
        check_append_fields(sender, receiver, body)?;

        // created_at is fixed at the moment of persistence; the relative
        // order of two concurrent sends is whichever insert completes first.
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO messages (sender, receiver, body, is_from_admin, is_read, created_at)
            VALUES (?, ?, ?, ?, FALSE, ?)
            "#,
        )
        .bind(sender)
        .bind(receiver)
        .bind(body)
        .bind(is_from_admin)
        .bind(created_at)
        .execute(&self.connection_pool)
        .await?;

        Ok(ChatMessage {
            id: result.last_insert_id() as i64,
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            body: body.to_string(),
            is_from_admin,
            read: false,
            created_at,
        })
    }

    async fn find_between(
        &self,
        id_a: &str,
        id_b: &str,
        before_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, AppError> {
        let messages = if let Some(before) = before_id {
            sqlx::query_as::<_, ChatMessage>(&format!(
                r#"
                SELECT {SELECT_COLUMNS}
                FROM messages
                WHERE ((sender = ? AND receiver = ?) OR (sender = ? AND receiver = ?))
                  AND id < ?
                ORDER BY id DESC
                LIMIT ?
                "#
            ))
            .bind(id_a)
            .bind(id_b)
            .bind(id_b)
            .bind(id_a)
            .bind(before)
            .bind(limit)
            .fetch_all(&self.connection_pool)
            .await?
        } else {
            sqlx::query_as::<_, ChatMessage>(&format!(
                r#"
                SELECT {SELECT_COLUMNS}
                FROM messages
                WHERE (sender = ? AND receiver = ?) OR (sender = ? AND receiver = ?)
                ORDER BY id DESC
                LIMIT ?
                "#
            ))
            .bind(id_a)
            .bind(id_b)
            .bind(id_b)
            .bind(id_a)
            .bind(limit)
            .fetch_all(&self.connection_pool)
            .await?
        };

        Ok(messages)
    }

    async fn find_all_involving(&self, id: &str) -> Result<Vec<ChatMessage>, AppError> {
        let messages = sqlx::query_as::<_, ChatMessage>(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM messages
            WHERE sender = ? OR receiver = ?
            "#
        ))
        .bind(id)
        .bind(id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(messages)
    }
}
