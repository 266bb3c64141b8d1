//! Application context - dependency injection container

use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use famcal_core::{CalendarService, ChatService};
use famcal_domain::datetime::DatetimeNormalizer;
use famcal_domain::{CalendarConfig, Config, DatetimeConfig, FamcalError, Result};
use famcal_infra::discord::{interactions_router, DiscordApi, InteractionHandler, SignatureVerifier};
use famcal_infra::{
    GeminiClient, GoogleCalendarClient, GoogleOAuthSettings, GoogleTokenSource, HttpClient,
    JsonHistoryStore,
};
use tracing::info;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub chat: Arc<ChatService>,
    pub discord: DiscordApi,
    handler: Arc<InteractionHandler>,
}

impl AppContext {
    /// Wire adapters and services from a loaded configuration.
    ///
    /// # Errors
    /// Returns `FamcalError::Config` when the configuration is invalid, the
    /// system prompt is missing or empty, or the Discord public key cannot
    /// be parsed.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let system_prompt = load_system_prompt(&config.gemini.system_prompt_path)?;
        let http_client = HttpClient::new()?;

        let generator = GeminiClient::new(&config.gemini.api_key, system_prompt, http_client.clone())
            .with_model(&config.gemini.model)
            .with_base_url(&config.gemini.base_url);
        let history = JsonHistoryStore::new(&config.history.path);

        let mut chat = ChatService::new(Arc::new(generator), Arc::new(history))
            .with_max_history_items(config.history.max_items);
        if let Some(calendar_config) = &config.calendar {
            let calendar = build_calendar(calendar_config, &config.datetime, &http_client)?;
            info!(calendar_id = %calendar_config.calendar_id, timezone = %calendar_config.timezone, "Calendar access enabled");
            chat = chat.with_calendar(Arc::new(calendar));
        } else {
            info!("Calendar access disabled");
        }
        let chat = Arc::new(chat);

        let discord = DiscordApi::new(
            http_client,
            &config.discord.token,
            &config.discord.application_id,
        );
        let verifier = SignatureVerifier::from_hex(&config.discord.public_key)?;
        let handler = Arc::new(InteractionHandler::new(
            verifier,
            &config.discord.guild_id,
            config.family.clone(),
            Arc::clone(&chat),
            discord.clone(),
        ));

        Ok(Self { config, chat, discord, handler })
    }

    /// HTTP routes served by the binary.
    pub fn router(&self) -> Router {
        interactions_router(Arc::clone(&self.handler))
    }

    /// Register `/ask` in the configured guild.
    ///
    /// # Errors
    /// Propagates Discord API failures.
    pub async fn register_commands(&self) -> Result<()> {
        self.discord.register_guild_commands(&self.config.discord.guild_id).await
    }
}

/// Read the system prompt, which must exist and contain non-whitespace text.
///
/// # Errors
/// Returns `FamcalError::Config` naming the path when the file is missing,
/// unreadable or blank.
pub fn load_system_prompt(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(FamcalError::Config(format!(
            "System prompt file not found: {}. Copy system_prompt.txt.sample to system_prompt.txt and edit it.",
            path.display()
        )));
    }

    let prompt = fs::read_to_string(path).map_err(|e| {
        FamcalError::Config(format!("Failed to read system prompt {}: {e}", path.display()))
    })?;
    if prompt.trim().is_empty() {
        return Err(FamcalError::Config(format!("System prompt file is empty: {}", path.display())));
    }
    Ok(prompt)
}

fn build_calendar(
    calendar: &CalendarConfig,
    datetime: &DatetimeConfig,
    http_client: &HttpClient,
) -> Result<CalendarService> {
    let tokens = Arc::new(GoogleTokenSource::new(
        GoogleOAuthSettings::from_config(calendar),
        http_client.clone(),
    ));
    let backend = GoogleCalendarClient::new(http_client.clone(), tokens, &calendar.calendar_id);
    let normalizer = DatetimeNormalizer::new(datetime.normalizer_settings()?)?;

    CalendarService::new(Arc::new(backend), Arc::new(normalizer), &calendar.timezone)
}
