//! Core - infrastructure shared by the whole service
//!
//! Authentication, configuration, error handling and application state.

pub mod auth;
pub mod config;
pub mod error;
pub mod state;

pub use auth::{Claims, authentication_middleware, decode_token, encode_token};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
