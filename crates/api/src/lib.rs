//! # famcal App
//!
//! Binary crate: wires configuration, adapters and services together and
//! serves the Discord interactions endpoint.
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture in [`AppContext`]

pub mod context;
pub mod utils;

pub use context::*;
