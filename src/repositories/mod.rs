//! Repositories - message store implementations
//!
//! `MessageStore` is the seam the rest of the core depends on; the router
//! and query services take `Arc<dyn MessageStore>` so the MySQL and the
//! in-memory implementations are interchangeable.

pub mod memory;
pub mod message;
pub mod traits;

pub use memory::MemoryMessageStore;
pub use message::MessageRepository;
pub use traits::MessageStore;
