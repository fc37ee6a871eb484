//! Integration tests for the history endpoint: cursor pagination over the
//! conversation between the caller and a counterparty.

mod common;

use axum::http::StatusCode;
use common::*;
use support_chat::dtos::HistoryPageDTO;

#[tokio::test]
async fn empty_store_returns_empty_page() {
    let state = create_test_state();
    let server = create_test_server(state);

    let response = server
        .get("/chat/history/admin")
        .authorization_bearer(user_token("u1"))
        .await;
    response.assert_status_ok();

    let page: HistoryPageDTO = response.json();
    assert!(page.messages.is_empty());
    assert_eq!(page.next_cursor, None);
    assert!(!page.has_more);
}

#[tokio::test]
async fn pages_backward_through_fifteen_messages() {
    let state = create_test_state();
    seed_conversation(&state, "u1", 15).await;
    let server = create_test_server(state);
    let token = user_token("u1");

    // First call, no cursor: the ten most recent messages, oldest first.
    let response = server
        .get("/chat/history/admin")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let page: HistoryPageDTO = response.json();

    let ids: Vec<i64> = page.messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, (6..=15).collect::<Vec<i64>>());
    assert_eq!(page.next_cursor, Some(6));
    assert!(page.has_more);

    // Follow-up with the returned cursor: the remaining five.
    let response = server
        .get("/chat/history/admin")
        .add_query_param("cursor", 6)
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let page: HistoryPageDTO = response.json();

    let ids: Vec<i64> = page.messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, (1..=5).collect::<Vec<i64>>());
    assert_eq!(page.next_cursor, Some(1));
    assert!(!page.has_more);

    // Repeating the final cursor is harmless: empty page, no more.
    let response = server
        .get("/chat/history/admin")
        .add_query_param("cursor", 1)
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let page: HistoryPageDTO = response.json();
    assert!(page.messages.is_empty());
    assert_eq!(page.next_cursor, None);
    assert!(!page.has_more);
}

#[tokio::test]
async fn same_cursor_returns_identical_page() {
    let state = create_test_state();
    seed_conversation(&state, "u1", 12).await;
    let server = create_test_server(state);
    let token = user_token("u1");

    let mut pages = Vec::new();
    for _ in 0..2 {
        let response = server
            .get("/chat/history/admin")
            .add_query_param("cursor", 8)
            .add_query_param("limit", 5)
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();
        pages.push(response.json::<HistoryPageDTO>());
    }

    assert_eq!(pages[0].messages, pages[1].messages);
    assert_eq!(pages[0].next_cursor, pages[1].next_cursor);
    assert_eq!(pages[0].has_more, pages[1].has_more);
}

#[tokio::test]
async fn chained_pages_cover_history_exactly_once() {
    let state = create_test_state();
    seed_conversation(&state, "u1", 15).await;
    let server = create_test_server(state);
    let token = user_token("u1");

    let mut collected: Vec<i64> = Vec::new();
    let mut cursor: Option<i64> = None;
    loop {
        let mut request = server
            .get("/chat/history/admin")
            .add_query_param("limit", 4)
            .authorization_bearer(&token);
        if let Some(c) = cursor {
            request = request.add_query_param("cursor", c);
        }
        let response = request.await;
        response.assert_status_ok();
        let page: HistoryPageDTO = response.json();

        // Within each page, oldest to newest.
        let ids: Vec<i64> = page.messages.iter().map(|m| m.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);

        // Pages run newest to oldest, so prepend.
        let mut next = ids;
        next.extend(collected);
        collected = next;

        if !page.has_more {
            break;
        }
        cursor = page.next_cursor;
    }

    assert_eq!(collected, (1..=15).collect::<Vec<i64>>());
}

#[tokio::test]
async fn admin_sees_the_same_conversation() {
    let state = create_test_state();
    seed_conversation(&state, "u1", 3).await;
    let server = create_test_server(state);

    let response = server
        .get("/chat/history/u1")
        .authorization_bearer(admin_token())
        .await;
    response.assert_status_ok();
    let page: HistoryPageDTO = response.json();

    assert_eq!(page.messages.len(), 3);
    assert!(page.messages[0].body.contains("message 1"));
    assert!(!page.messages[0].is_from_admin);
    assert!(page.messages[1].is_from_admin);
}

#[tokio::test]
async fn rejects_missing_and_invalid_tokens() {
    let state = create_test_state();
    let server = create_test_server(state);

    let response = server.get("/chat/history/admin").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/chat/history/admin")
        .authorization_bearer("not-a-jwt")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn blank_counterparty_is_a_validation_error() {
    let state = create_test_state();
    let server = create_test_server(state);

    let response = server
        .get("/chat/history/%20")
        .authorization_bearer(user_token("u1"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
