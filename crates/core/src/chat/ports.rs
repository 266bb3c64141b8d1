//! Port interfaces for a chat turn
//!
//! These traits define the boundaries between the chat orchestration
//! and the storage/generation adapters.

use async_trait::async_trait;
use famcal_domain::{ConversationTurn, Result};

/// Per-user conversation history, capped at a fixed number of turns
#[async_trait]
pub trait ConversationLog: Send + Sync {
    /// Stored turns for a user, oldest first. Unknown users have none.
    async fn get(&self, user_id: &str) -> Result<Vec<ConversationTurn>>;

    /// Append a user turn and a model turn, keeping only the newest
    /// `max_items` entries. Returns the history as stored.
    async fn append(
        &self,
        user_id: &str,
        user_prompt: &str,
        model_response: &str,
        max_items: usize,
    ) -> Result<Vec<ConversationTurn>>;
}

/// Remote text generation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply to `prompt` given the prior `history`.
    ///
    /// Fails when the remote call is not successful or yields no text.
    async fn generate(&self, prompt: &str, history: &[ConversationTurn]) -> Result<String>;
}
