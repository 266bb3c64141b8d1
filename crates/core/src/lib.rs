//! # famcal Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits)
//! - The calendar and chat services
//!
//! ## Architecture Principles
//! - Only depends on `famcal-domain`
//! - No HTTP, file or platform code
//! - All external dependencies via traits

pub mod calendar;
pub mod chat;

pub use calendar::{format_outcome, CalendarBackend, CalendarService};
pub use chat::{ChatRequest, ChatService, ConversationLog, TextGenerator};
