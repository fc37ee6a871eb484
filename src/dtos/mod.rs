//! DTOs - data transfer objects of the HTTP query API and the live protocol

pub mod history;
pub mod message;
pub mod ws_event;

pub use history::{HistoryPageDTO, HistoryQuery, ThreadSummaryDTO};
pub use message::{ChatMessageDTO, SendMessageDTO};
pub use ws_event::{ClientEvent, ServerEvent};
