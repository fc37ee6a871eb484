//! Application state shared across routes, middleware and connections

use crate::repositories::{MessageRepository, MessageStore};
use crate::ws::RoomRegistry;
use sqlx::MySqlPool;
use std::sync::Arc;

pub struct AppState {
    /// Durable message log. Trait object so tests can swap in the in-memory
    /// store.
    pub store: Arc<dyn MessageStore>,

    /// Live connections and their room memberships, process-local.
    pub registry: RoomRegistry,

    /// Secret the booking app signs its tokens with.
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(pool: MySqlPool, jwt_secret: String) -> Self {
        Self::with_store(Arc::new(MessageRepository::new(pool)), jwt_secret)
    }

    pub fn with_store(store: Arc<dyn MessageStore>, jwt_secret: String) -> Self {
        Self {
            store,
            registry: RoomRegistry::new(),
            jwt_secret,
        }
    }
}
