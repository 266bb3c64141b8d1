//! # famcal Domain
//!
//! Business domain types and models for famcal.
//!
//! This crate contains:
//! - The natural-language datetime normalizer and range validator
//! - Calendar, conversation and intent types
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other famcal crates
//! - No I/O; everything here is pure and synchronous

pub mod config;
pub mod constants;
pub mod datetime;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use datetime::{normalize_datetime, validate_range, DatetimeError, DatetimeNormalizer};
pub use errors::*;
pub use types::*;
