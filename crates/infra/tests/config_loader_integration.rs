//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use famcal_domain::FamcalError;
use famcal_infra::config;
use tempfile::NamedTempFile;

fn write_with_extension(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_full_toml_config() {
    let path = write_with_extension(
        r#"
[discord]
token = "bot-token"
guild_id = "123"
application_id = "456"
public_key = "aa"

[gemini]
api_key = "gemini-key"
model = "gemini-2.5-pro"
system_prompt_path = "prompts/family.txt"

[history]
path = "/var/lib/famcal/history.json"
max_items = 12

[server]
listen_addr = "127.0.0.1:9000"

[calendar]
calendar_id = "family@group.calendar.google.com"
client_id = "client"
client_secret = "secret"
refresh_token = "refresh"
timezone = "Europe/Berlin"

[datetime]
rollover_days = 60
locales = ["en"]

[family]
"111" = "Alice"
"222" = "Bob"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should load");

    assert_eq!(config.discord.guild_id, "123");
    assert_eq!(config.gemini.model, "gemini-2.5-pro");
    assert_eq!(config.history.max_items, 12);
    assert_eq!(config.server.listen_addr, "127.0.0.1:9000");
    let calendar = config.calendar.as_ref().expect("calendar block");
    assert_eq!(calendar.timezone, "Europe/Berlin");
    assert_eq!(config.datetime.rollover_days, 60);
    assert_eq!(config.display_name_for("222"), Some("Bob"));
    assert!(config.validate().is_ok());

    std::fs::remove_file(path).ok();
}

#[test]
fn test_loaded_config_can_fail_validation() {
    let path = write_with_extension(
        r#"{
            "discord": {"token": "t", "guild_id": "1", "application_id": "2", "public_key": "ab"},
            "gemini": {"api_key": "k"},
            "history": {"max_items": 1}
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should parse");
    assert!(matches!(config.validate(), Err(FamcalError::Config(_))));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_required_section_is_config_error() {
    let path = write_with_extension("[gemini]\napi_key = \"k\"\n", "toml");

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(FamcalError::Config(ref msg)) if msg.contains("TOML")));

    std::fs::remove_file(path).ok();
}
