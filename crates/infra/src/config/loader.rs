//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the process environment when one exists
//! 2. Attempts to load from environment variables
//! 3. If required variables are missing, falls back to a config file
//! 4. Probes multiple paths for config files (JSON or TOML)
//!
//! ## Environment Variables
//! Required:
//! - `DISCORD_TOKEN`: Bot token used for command registration and replies
//! - `DISCORD_SERVER_ID`: The one guild the bot answers in
//! - `DISCORD_APPLICATION_ID`: Application id for interaction webhooks
//! - `DISCORD_PUBLIC_KEY`: Hex ed25519 key for request signatures
//! - `GEMINI_API_KEY`: Generative Language API key
//!
//! Optional:
//! - `GEMINI_MODEL` (default `gemini-2.5-flash`), `GEMINI_BASE_URL`
//! - `SYSTEM_PROMPT_PATH` (default `system_prompt.txt`)
//! - `HISTORY_PATH` (default `data/history.json`)
//! - `MAX_HISTORY_ITEMS` (default 10)
//! - `LISTEN_ADDR` (default `0.0.0.0:8080`)
//! - `FAMILY_ID<n>` / `FAMILY_NAME<n>`: Discord user id to display name
//! - `GOOGLE_CALENDAR_ID`: enables calendar access; then
//!   `GOOGLE_CALENDAR_CLIENT_ID`, `GOOGLE_CALENDAR_CLIENT_SECRET` and
//!   `GOOGLE_CALENDAR_REFRESH_TOKEN` are required, `CALENDAR_TIMEZONE`
//!   defaults to `Asia/Tokyo`
//! - `DATETIME_ROLLOVER_DAYS` (default 180), `DATETIME_LOCALES` (default `ja,en`)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./famcal.json` or `./famcal.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use famcal_domain::constants::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_HISTORY_PATH, DEFAULT_LISTEN_ADDR,
    DEFAULT_MAX_HISTORY_ITEMS, DEFAULT_SYSTEM_PROMPT_PATH, DEFAULT_TIMEZONE,
};
use famcal_domain::{
    CalendarConfig, Config, DatetimeConfig, DiscordConfig, FamcalError, GeminiConfig,
    HistoryConfig, Result, ServerConfig,
};
use once_cell::sync::Lazy;
use regex::Regex;

static FAMILY_ID_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^FAMILY_ID(\d+)$").expect("family id pattern should compile - this is a bug")
});

/// Load configuration with automatic fallback strategy
///
/// Reads `.env` first, then attempts environment variables. If any
/// required variable is missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `FamcalError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `FamcalError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let discord = DiscordConfig {
        token: env_var("DISCORD_TOKEN")?,
        guild_id: env_parse::<u64>("DISCORD_SERVER_ID")?.to_string(),
        application_id: env_var("DISCORD_APPLICATION_ID")?,
        public_key: env_var("DISCORD_PUBLIC_KEY")?,
    };

    let gemini = GeminiConfig {
        api_key: env_var("GEMINI_API_KEY")?,
        model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
        system_prompt_path: PathBuf::from(env_or("SYSTEM_PROMPT_PATH", DEFAULT_SYSTEM_PROMPT_PATH)),
        base_url: env_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
    };

    let history = HistoryConfig {
        path: PathBuf::from(env_or("HISTORY_PATH", DEFAULT_HISTORY_PATH)),
        max_items: env_parse_or("MAX_HISTORY_ITEMS", DEFAULT_MAX_HISTORY_ITEMS)?,
    };

    let server = ServerConfig { listen_addr: env_or("LISTEN_ADDR", DEFAULT_LISTEN_ADDR) };

    let calendar = match env_optional("GOOGLE_CALENDAR_ID") {
        Some(calendar_id) => Some(CalendarConfig {
            calendar_id,
            client_id: env_var("GOOGLE_CALENDAR_CLIENT_ID")?,
            client_secret: env_var("GOOGLE_CALENDAR_CLIENT_SECRET")?,
            refresh_token: env_var("GOOGLE_CALENDAR_REFRESH_TOKEN")?,
            timezone: env_or("CALENDAR_TIMEZONE", DEFAULT_TIMEZONE),
        }),
        None => None,
    };

    let defaults = DatetimeConfig::default();
    let datetime = DatetimeConfig {
        rollover_days: env_parse_or("DATETIME_ROLLOVER_DAYS", defaults.rollover_days)?,
        locales: env_optional("DATETIME_LOCALES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.locales),
    };

    Ok(Config {
        discord,
        gemini,
        history,
        server,
        calendar,
        datetime,
        family: build_family_map(std::env::vars()),
    })
}

/// Pair `FAMILY_ID<n>` with `FAMILY_NAME<n>` into a user id → name map.
///
/// Entries with an empty id or a missing/empty name are skipped.
pub fn build_family_map<I>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let vars: HashMap<String, String> = vars.into_iter().collect();
    let mut family = HashMap::new();

    for (key, user_id) in &vars {
        let Some(captures) = FAMILY_ID_KEY.captures(key) else {
            continue;
        };
        if user_id.is_empty() {
            continue;
        }
        let name_key = format!("FAMILY_NAME{}", &captures[1]);
        if let Some(name) = vars.get(&name_key).filter(|name| !name.is_empty()) {
            family.insert(user_id.clone(), name.clone());
        }
    }

    family
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `FamcalError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FamcalError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FamcalError::Config(
                "No config file found and required environment variables are missing".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| FamcalError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| FamcalError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FamcalError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(FamcalError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(config_candidates(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(config_candidates(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn config_candidates(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("famcal.json"),
        dir.join("famcal.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `FamcalError::Config` if the variable is unset or empty.
fn env_var(key: &str) -> Result<String> {
    env_optional(key).ok_or_else(|| {
        FamcalError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}

fn env_parse<T>(key: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env_var(key)?;
    raw.trim().parse::<T>().map_err(|e| FamcalError::Config(format!("Invalid {}: {}", key, e)))
}

fn env_parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_optional(key) {
        Some(_) => env_parse(key),
        None => Ok(default),
    }
}
