//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::datetime::DatetimeError;

/// Main error type for famcal
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum FamcalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Calendar operation rejected by the service or the provider.
    #[error("{0}")]
    Calendar(String),

    /// Text generation call failed or returned nothing usable.
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Datetime(#[from] DatetimeError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FamcalError {
    /// Stable label suitable for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Calendar(_) => "calendar",
            Self::Generation(_) => "generation",
            Self::Storage(_) => "storage",
            Self::Datetime(_) => "datetime",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for famcal operations
pub type Result<T> = std::result::Result<T, FamcalError>;
