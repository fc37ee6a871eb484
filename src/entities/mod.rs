//! Entities - persistent and identity types of the chat core

pub mod identity;
pub mod message;

pub use identity::{ADMIN_ID, Identity};
pub use message::ChatMessage;
