//! History DTOs - pagination query and page/thread responses

use super::ChatMessageDTO;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters of the history endpoint. `cursor` is the id of the
/// oldest message of the previously returned page.
#[derive(Serialize, Deserialize, Debug)]
pub struct HistoryQuery {
    #[serde(default)]
    pub cursor: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl HistoryQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

/// One page of conversation history, oldest to newest. Feed `next_cursor`
/// back as `cursor` to fetch the next older page; `has_more` is false once
/// the conversation start has been reached.
#[derive(Serialize, Deserialize, Debug)]
pub struct HistoryPageDTO {
    pub messages: Vec<ChatMessageDTO>,
    pub next_cursor: Option<i64>,
    pub has_more: bool,
}

/// One conversation thread of the viewer, summarized by its latest message.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ThreadSummaryDTO {
    pub counterparty: String,
    pub last_message: String,
    pub last_at: DateTime<Utc>,
    pub last_from_admin: bool,
}
