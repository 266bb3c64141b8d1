//! Discord transport: signed HTTP interactions plus the REST calls needed
//! to register `/ask` and deliver replies.

pub mod api;
pub mod interactions;
pub mod signature;
pub mod types;

pub use api::DiscordApi;
pub use interactions::{interactions_router, InteractionHandler};
pub use signature::SignatureVerifier;
