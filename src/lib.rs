//! Support-chat server library
//!
//! Real-time two-party messaging core of the booking application: persisted
//! message log, cursor-paged history, per-counterparty thread summaries and
//! live WebSocket delivery between users and the admin side.

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod ws;

pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{Router, middleware, routing::{any, get}};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Builds the application router: the authenticated query API under `/chat`
/// and the WebSocket upgrade at `/ws` (where authentication is optional and
/// resolved during the upgrade itself).
pub fn create_router(state: Arc<AppState>) -> Router {
    use ws::ws_handler;

    Router::new()
        .route("/", get(root))
        .nest("/chat", configure_chat_routes(state.clone()))
        .route("/ws", any(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn configure_chat_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/history/{counterparty}", get(get_chat_history))
        .route("/threads", get(list_threads))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
