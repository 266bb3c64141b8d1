//! Application wiring from a loaded configuration

use std::collections::HashMap;
use std::path::PathBuf;

use ed25519_dalek::SigningKey;
use famcal_app::{load_system_prompt, AppContext};
use famcal_domain::{
    CalendarConfig, Config, DatetimeConfig, DiscordConfig, FamcalError, GeminiConfig,
    HistoryConfig, ServerConfig,
};
use tempfile::TempDir;

fn config(dir: &TempDir, prompt: Option<&str>) -> Config {
    let prompt_path = dir.path().join("system_prompt.txt");
    if let Some(prompt) = prompt {
        std::fs::write(&prompt_path, prompt).unwrap();
    }

    let public_key = SigningKey::from_bytes(&[7u8; 32]).verifying_key();
    Config {
        discord: DiscordConfig {
            token: "bot-token".into(),
            guild_id: "4242".into(),
            application_id: "app-1".into(),
            public_key: hex::encode(public_key.to_bytes()),
        },
        gemini: GeminiConfig {
            api_key: "key".into(),
            model: "gemini-2.5-flash".into(),
            system_prompt_path: prompt_path,
            base_url: "http://127.0.0.1:9".into(),
        },
        history: HistoryConfig { path: dir.path().join("history.json"), max_items: 10 },
        server: ServerConfig::default(),
        calendar: None,
        datetime: DatetimeConfig::default(),
        family: HashMap::new(),
    }
}

#[test]
fn builds_chat_only_context() {
    let dir = TempDir::new().unwrap();
    let ctx = AppContext::new(config(&dir, Some("あなたは家族のアシスタントです。"))).unwrap();

    assert!(ctx.config.calendar.is_none());
    let _router = ctx.router();
}

#[test]
fn builds_context_with_calendar() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir, Some("prompt"));
    config.calendar = Some(CalendarConfig {
        calendar_id: "primary".into(),
        client_id: "client".into(),
        client_secret: "secret".into(),
        refresh_token: "refresh".into(),
        timezone: "Asia/Tokyo".into(),
    });

    assert!(AppContext::new(config).is_ok());
}

#[test]
fn missing_or_blank_system_prompt_is_rejected() {
    let dir = TempDir::new().unwrap();
    let missing = AppContext::new(config(&dir, None));
    assert!(matches!(missing, Err(FamcalError::Config(ref msg)) if msg.contains("not found")));

    let blank_dir = TempDir::new().unwrap();
    let blank = AppContext::new(config(&blank_dir, Some("  \n")));
    assert!(matches!(blank, Err(FamcalError::Config(ref msg)) if msg.contains("empty")));
}

#[test]
fn invalid_public_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir, Some("prompt"));
    config.discord.public_key = "zz".into();

    assert!(matches!(AppContext::new(config), Err(FamcalError::Config(_))));
}

#[test]
fn system_prompt_is_returned_verbatim() {
    let dir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("prompt.txt");
    std::fs::write(&path, "line one\nline two\n").unwrap();

    assert_eq!(load_system_prompt(&path).unwrap(), "line one\nline two\n");
}
