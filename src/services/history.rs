//! History services - cursor pagination and thread listing

use crate::core::{AppError, AppState};
use crate::dtos::{ChatMessageDTO, HistoryPageDTO, HistoryQuery, ThreadSummaryDTO};
use crate::entities::{ChatMessage, Identity};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Pages backward through the conversation between the caller and
/// `counterparty`.
///
/// One extra row is fetched to decide `has_more`; the retained rows come
/// newest-first from the store and are reversed to oldest-first for the
/// client. `next_cursor` is the id of the oldest returned message. With no
/// cursor the page holds the most recent messages; repeating a cursor past
/// the conversation start yields an empty page with `has_more = false`.
#[instrument(skip(state, viewer), fields(viewer = %viewer, counterparty = %counterparty))]
pub async fn get_chat_history(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<Identity>,
    Path(counterparty): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryPageDTO>, AppError> {
    if counterparty.trim().is_empty() {
        return Err(AppError::bad_request("counterparty required"));
    }

    let limit = params.effective_limit();
    let mut rows = state
        .store
        .find_between(viewer.as_str(), &counterparty, params.cursor, limit + 1)
        .await?;

    let has_more = rows.len() as i64 > limit;
    if has_more {
        // The extra row only proves an older page exists.
        rows.truncate(limit as usize);
    }
    rows.reverse();

    let next_cursor = rows.first().map(|m| m.id);
    let messages: Vec<ChatMessageDTO> = rows.into_iter().map(ChatMessageDTO::from).collect();

    info!(count = messages.len(), has_more, "history page served");
    Ok(Json(HistoryPageDTO {
        messages,
        next_cursor,
        has_more,
    }))
}

/// Lists the caller's conversation threads, most recently active first.
///
/// Derived per query from every message involving the viewer: for each
/// distinct counterparty, the message with the greatest `created_at`
/// (greatest `id` on ties). Nothing is persisted. A deployment with long
/// histories would maintain this as a summary table updated on append; the
/// full scan is the reference semantics.
#[instrument(skip(state, viewer), fields(viewer = %viewer))]
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<Identity>,
) -> Result<Json<Vec<ThreadSummaryDTO>>, AppError> {
    let messages = state.store.find_all_involving(viewer.as_str()).await?;
    debug!(scanned = messages.len(), "aggregating threads");

    let mut latest: HashMap<String, ChatMessage> = HashMap::new();
    for message in messages {
        let counterparty = message.counterparty_of(viewer.as_str()).to_string();
        match latest.get(&counterparty) {
            Some(current)
                if (current.created_at, current.id) >= (message.created_at, message.id) => {}
            _ => {
                latest.insert(counterparty, message);
            }
        }
    }

    let mut threads: Vec<ThreadSummaryDTO> = latest
        .into_iter()
        .map(|(counterparty, m)| ThreadSummaryDTO {
            counterparty,
            last_message: m.body,
            last_at: m.created_at,
            last_from_admin: m.is_from_admin,
        })
        .collect();
    threads.sort_by(|a, b| b.last_at.cmp(&a.last_at));

    info!(count = threads.len(), "threads listed");
    Ok(Json(threads))
}
