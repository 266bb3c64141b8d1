//! Google Calendar integration
//!
//! Refresh-token OAuth plus an events client that implements the
//! `CalendarBackend` port.

pub mod google;
pub mod oauth;
pub mod types;

pub use google::GoogleCalendarClient;
pub use oauth::{GoogleOAuthSettings, GoogleTokenSource};
