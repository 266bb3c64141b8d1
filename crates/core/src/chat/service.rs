//! Chat service - one `/ask` turn from prompt to reply

use std::sync::Arc;

use famcal_domain::constants::{
    DEFAULT_MAX_HISTORY_ITEMS, DISCORD_MESSAGE_LIMIT, ERROR_REPLY_PREFIX,
};
use famcal_domain::utils::text::fit_message;
use famcal_domain::{CalendarIntent, Result};
use tracing::{debug, error, info, instrument};

use super::ports::{ConversationLog, TextGenerator};
use super::prompt::{build_user_prompt, calendar_protocol, quote_reply};
use crate::calendar::{format_outcome, CalendarService};

/// One incoming message, already attributed to a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub user_id: String,
    pub display_name: String,
    pub message: String,
}

impl ChatRequest {
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self { user_id: user_id.into(), display_name: display_name.into(), message: message.into() }
    }
}

/// Orchestrates history, generation and optional calendar execution.
pub struct ChatService {
    generator: Arc<dyn TextGenerator>,
    history: Arc<dyn ConversationLog>,
    calendar: Option<Arc<CalendarService>>,
    max_history_items: usize,
    message_limit: usize,
}

impl ChatService {
    pub fn new(generator: Arc<dyn TextGenerator>, history: Arc<dyn ConversationLog>) -> Self {
        Self {
            generator,
            history,
            calendar: None,
            max_history_items: DEFAULT_MAX_HISTORY_ITEMS,
            message_limit: DISCORD_MESSAGE_LIMIT,
        }
    }

    /// Enable calendar intents.
    pub fn with_calendar(mut self, calendar: Arc<CalendarService>) -> Self {
        self.calendar = Some(calendar);
        self
    }

    pub fn with_max_history_items(mut self, max_items: usize) -> Self {
        self.max_history_items = max_items;
        self
    }

    pub fn with_message_limit(mut self, limit: usize) -> Self {
        self.message_limit = limit;
        self
    }

    /// Run a turn and always produce reply text.
    ///
    /// Failures are logged and reported as `オカメパニック: {error}`.
    pub async fn handle(&self, request: &ChatRequest) -> String {
        match self.respond(request).await {
            Ok(reply) => reply,
            Err(err) => {
                error!(user_id = %request.user_id, error = %err, kind = err.label(), "Failed to handle chat turn");
                fit_message(&format!("{ERROR_REPLY_PREFIX}: {err}"), self.message_limit)
            }
        }
    }

    /// Run a turn, returning the quoted reply capped to the message limit.
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn respond(&self, request: &ChatRequest) -> Result<String> {
        let prompt = build_user_prompt(&request.display_name, &request.message);
        let history = self.history.get(&request.user_id).await?;
        debug!(history_len = history.len(), "Loaded conversation history");

        let generation_prompt = match &self.calendar {
            Some(calendar) => {
                format!("{}\n\n{prompt}", calendar_protocol(calendar.now(), calendar.timezone()))
            }
            None => prompt.clone(),
        };
        let generated = self.generator.generate(&generation_prompt, &history).await?;

        let answer = match (&self.calendar, CalendarIntent::from_model_text(&generated)) {
            (Some(calendar), Some(intent)) => {
                info!(action = %intent.action, "Model requested a calendar operation");
                let outcome = calendar.execute(&intent).await?;
                format_outcome(&outcome)
            }
            _ => generated,
        };

        self.history.append(&request.user_id, &prompt, &answer, self.max_history_items).await?;

        Ok(fit_message(&quote_reply(&request.message, &answer), self.message_limit))
    }
}
