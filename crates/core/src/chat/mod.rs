//! Chat turn orchestration

pub mod ports;
pub mod prompt;
pub mod service;

pub use ports::{ConversationLog, TextGenerator};
pub use prompt::{build_user_prompt, calendar_protocol, quote_reply, resolve_display_name};
pub use service::{ChatRequest, ChatService};
