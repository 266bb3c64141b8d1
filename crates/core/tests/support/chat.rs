use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use famcal_core::{ConversationLog, TextGenerator};
use famcal_domain::{ConversationTurn, FamcalError, Result as DomainResult};

/// Scripted `TextGenerator` that records every prompt it receives.
#[derive(Clone)]
pub struct ScriptedGenerator {
    reply: Arc<Mutex<DomainResult<String>>>,
    prompts: Arc<Mutex<Vec<(String, usize)>>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self { reply: Arc::new(Mutex::new(Ok(reply.into()))), prompts: Arc::default() }
    }

    pub fn failing(error: FamcalError) -> Self {
        Self { reply: Arc::new(Mutex::new(Err(error))), prompts: Arc::default() }
    }

    /// `(prompt, history length)` for each call.
    pub fn prompts(&self) -> Vec<(String, usize)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, history: &[ConversationTurn]) -> DomainResult<String> {
        self.prompts.lock().unwrap().push((prompt.to_string(), history.len()));
        self.reply.lock().unwrap().clone()
    }
}

/// In-memory `ConversationLog` with the same trimming rule as the file store.
#[derive(Default, Clone)]
pub struct InMemoryConversationLog {
    turns: Arc<Mutex<HashMap<String, Vec<ConversationTurn>>>>,
}

impl InMemoryConversationLog {
    pub fn history(&self, user_id: &str) -> Vec<ConversationTurn> {
        self.turns.lock().unwrap().get(user_id).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ConversationLog for InMemoryConversationLog {
    async fn get(&self, user_id: &str) -> DomainResult<Vec<ConversationTurn>> {
        Ok(self.history(user_id))
    }

    async fn append(
        &self,
        user_id: &str,
        user_prompt: &str,
        model_response: &str,
        max_items: usize,
    ) -> DomainResult<Vec<ConversationTurn>> {
        let mut turns = self.turns.lock().unwrap();
        let history = turns.entry(user_id.to_string()).or_default();
        history.push(ConversationTurn::user(user_prompt));
        history.push(ConversationTurn::model(model_response));
        let excess = history.len().saturating_sub(max_items);
        history.drain(..excess);
        Ok(history.clone())
    }
}
