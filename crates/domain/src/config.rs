//! Configuration structures
//!
//! Populated by the infra loader from environment variables or a
//! `config.toml` / `config.json` file.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_HISTORY_PATH, DEFAULT_LISTEN_ADDR,
    DEFAULT_MAX_HISTORY_ITEMS, DEFAULT_SYSTEM_PROMPT_PATH, DEFAULT_TIMEZONE, MIN_HISTORY_ITEMS,
};
use crate::datetime::{
    resolve_timezone, NormalizerSettings, Vocabulary, DEFAULT_ROLLOVER_DAYS, MAX_ROLLOVER_DAYS,
};
use crate::errors::{FamcalError, Result};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discord: DiscordConfig,
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Calendar access is optional; without it the bot only chats.
    #[serde(default)]
    pub calendar: Option<CalendarConfig>,
    #[serde(default)]
    pub datetime: DatetimeConfig,
    /// Discord user id → display name.
    #[serde(default)]
    pub family: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    pub token: String,
    /// The only guild the `/ask` command answers in.
    pub guild_id: String,
    pub application_id: String,
    /// Hex-encoded ed25519 public key of the application.
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_system_prompt_path")]
    pub system_prompt_path: PathBuf,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: PathBuf,
    pub max_items: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { path: PathBuf::from(DEFAULT_HISTORY_PATH), max_items: DEFAULT_MAX_HISTORY_ITEMS }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { listen_addr: DEFAULT_LISTEN_ADDR.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub calendar_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatetimeConfig {
    pub rollover_days: i64,
    /// Built-in vocabularies to merge, in priority order (`"ja"`, `"en"`).
    pub locales: Vec<String>,
}

impl Default for DatetimeConfig {
    fn default() -> Self {
        Self {
            rollover_days: DEFAULT_ROLLOVER_DAYS,
            locales: vec!["ja".to_string(), "en".to_string()],
        }
    }
}

impl DatetimeConfig {
    /// Build normalizer settings from the configured locales.
    ///
    /// # Errors
    /// Returns `FamcalError::Config` for an unknown locale, an empty locale
    /// list or a rollover window outside `0..=MAX_ROLLOVER_DAYS`.
    pub fn normalizer_settings(&self) -> Result<NormalizerSettings> {
        if !(0..=MAX_ROLLOVER_DAYS).contains(&self.rollover_days) {
            return Err(FamcalError::Config(format!(
                "rollover_days must be between 0 and {MAX_ROLLOVER_DAYS}: {}",
                self.rollover_days
            )));
        }

        let mut vocabulary: Option<Vocabulary> = None;
        for tag in &self.locales {
            let next = Vocabulary::for_locale(tag)
                .ok_or_else(|| FamcalError::Config(format!("Unsupported datetime locale: {tag}")))?;
            vocabulary = Some(match vocabulary {
                Some(current) => current.merge(next),
                None => next,
            });
        }
        let vocabulary = vocabulary
            .ok_or_else(|| FamcalError::Config("At least one datetime locale is required".into()))?;

        Ok(NormalizerSettings { rollover_days: self.rollover_days, vocabulary })
    }
}

impl Config {
    /// Check cross-field constraints the type system does not express.
    ///
    /// # Errors
    /// Returns `FamcalError::Config` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.history.max_items < MIN_HISTORY_ITEMS {
            return Err(FamcalError::Config(format!(
                "max_history_items must be at least {MIN_HISTORY_ITEMS}"
            )));
        }
        if self.discord.guild_id.trim().is_empty() {
            return Err(FamcalError::Config("discord guild_id must not be empty".into()));
        }
        if let Some(calendar) = &self.calendar {
            resolve_timezone(&calendar.timezone)
                .map_err(|e| FamcalError::Config(format!("calendar timezone: {e}")))?;
        }
        self.datetime.normalizer_settings()?;
        Ok(())
    }

    pub fn display_name_for(&self, user_id: &str) -> Option<&str> {
        self.family.get(user_id).map(String::as_str).filter(|name| !name.is_empty())
    }
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_system_prompt_path() -> PathBuf {
    PathBuf::from(DEFAULT_SYSTEM_PROMPT_PATH)
}

fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}
