//! Domain types and models

pub mod calendar;
pub mod conversation;
pub mod intent;

pub use calendar::{CalendarEvent, CalendarOutcome, EventPatch, EventQuery, EventTime, NewEvent};
pub use conversation::{ConversationTurn, TurnPart, TurnRole};
pub use intent::{CalendarAction, CalendarIntent, IntentArgs};
