//! Calendar intents emitted by the text generator as JSON.
//!
//! The model is instructed to answer `{"action": "...", "args": {...}}`
//! when a message asks for a calendar operation. Anything else is treated
//! as a plain chat answer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_domain_status_conversions;
use crate::utils::text::extract_json_object;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarAction {
    List,
    Create,
    Update,
    Delete,
}

impl_domain_status_conversions!(CalendarAction {
    List => "list",
    Create => "create",
    Update => "update",
    Delete => "delete",
});

/// Arguments accepted by every action; each action reads the ones it needs.
///
/// Datetime fields are free text and go through the normalizer before use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentArgs {
    pub event_id: Option<String>,
    pub query: Option<String>,
    pub time_min: Option<String>,
    pub time_max: Option<String>,
    pub max_results: Option<u32>,
    pub summary: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// IANA name overriding the calendar's default zone.
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarIntent {
    pub action: CalendarAction,
    #[serde(default)]
    pub args: IntentArgs,
}

impl CalendarIntent {
    /// Parse an intent out of a model reply. `None` means "not an intent".
    pub fn from_model_text(text: &str) -> Option<Self> {
        let object = extract_json_object(text)?;
        let action = object.get("action")?.as_str()?.parse::<CalendarAction>().ok()?;
        let args = match object.get("args") {
            Some(Value::Object(raw)) => parse_args(raw),
            _ => IntentArgs::default(),
        };
        Some(Self { action, args })
    }
}

/// Lenient field-by-field read: blank strings count as absent and
/// `max_results` may arrive as a number or a numeric string.
fn parse_args(raw: &serde_json::Map<String, Value>) -> IntentArgs {
    let text = |key: &str| {
        raw.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    let max_results = raw.get("max_results").and_then(|value| match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });

    IntentArgs {
        event_id: text("event_id"),
        query: text("query"),
        time_min: text("time_min"),
        time_max: text("time_max"),
        max_results,
        summary: text("summary"),
        start: text("start"),
        end: text("end"),
        description: text("description"),
        location: text("location"),
        timezone: text("timezone"),
    }
}
