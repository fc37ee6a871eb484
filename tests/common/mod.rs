//! Shared helpers for the integration tests: application state backed by the
//! in-memory message store, a TestServer and token minting.

#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use support_chat::core::{AppState, auth};
use support_chat::entities::Identity;
use support_chat::repositories::MemoryMessageStore;

pub const TEST_JWT_SECRET: &str = "test-secret-rotated-in-real-deployments";

pub fn create_test_state() -> Arc<AppState> {
    Arc::new(AppState::with_store(
        Arc::new(MemoryMessageStore::new()),
        TEST_JWT_SECRET.to_string(),
    ))
}

pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = support_chat::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

pub fn user_token(user_id: &str) -> String {
    auth::encode_token(&Identity::User(user_id.to_string()), TEST_JWT_SECRET)
        .expect("Failed to create token")
}

pub fn admin_token() -> String {
    auth::encode_token(&Identity::Admin, TEST_JWT_SECRET).expect("Failed to create token")
}

/// Seeds `count` messages between `user` and the admin side, alternating
/// direction, user first. Ids are 1..=count in creation order.
pub async fn seed_conversation(state: &AppState, user: &str, count: usize) {
    for i in 1..=count {
        let (sender, receiver, from_admin) = if i % 2 == 1 {
            (user, "admin", false)
        } else {
            ("admin", user, true)
        };
        state
            .store
            .append(sender, receiver, &format!("message {i}"), from_admin)
            .await
            .expect("seed append failed");
    }
}
