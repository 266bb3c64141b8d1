//! # famcal Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The retrying HTTP client
//! - Gemini and Google Calendar adapters
//! - The JSON-file conversation log
//! - The Discord interactions endpoint and REST client
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `famcal-core`
//! - Depends on `famcal-domain` and `famcal-core`
//! - Contains all "impure" code (network, files, environment)

pub mod config;
pub mod discord;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod storage;

pub use errors::InfraError;
pub use http::*;
pub use integrations::calendar::{GoogleCalendarClient, GoogleOAuthSettings, GoogleTokenSource};
pub use integrations::gemini::GeminiClient;
pub use storage::JsonHistoryStore;
