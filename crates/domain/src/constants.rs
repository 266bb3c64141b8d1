//! Application constants
//!
//! Centralized location for domain-level constants shared by the services
//! and the adapters.

// Chat transport
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;
pub const MESSAGE_TRUNCATE_SUFFIX: &str = "...";
pub const GUILD_RESTRICTED_MESSAGE: &str = "このBotはこのサーバーでは使用できません。";
pub const ERROR_REPLY_PREFIX: &str = "オカメパニック";

// Text generation
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// Conversation history
pub const DEFAULT_HISTORY_PATH: &str = "data/history.json";
pub const DEFAULT_MAX_HISTORY_ITEMS: usize = 10;
pub const MIN_HISTORY_ITEMS: usize = 2;
pub const DEFAULT_SYSTEM_PROMPT_PATH: &str = "system_prompt.txt";

// Calendar
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";
pub const DEFAULT_LIST_MAX_RESULTS: u32 = 10;
pub const MAX_LIST_RESULTS: u32 = 20;
pub const EVENT_SEARCH_MAX_RESULTS: u32 = 5;
pub const EVENT_SEARCH_LOOKBACK_DAYS: i64 = 30;
pub const EVENT_SEARCH_LOOKAHEAD_DAYS: i64 = 365;
pub const DEFAULT_EVENT_DURATION_MINUTES: i64 = 60;
pub const UNTITLED_EVENT: &str = "(無題)";

// Server
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
