//! Discord interaction payloads
//!
//! Only the fields the `/ask` command needs. Unknown fields are ignored on
//! input and never emitted on output.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Interaction type: health check from Discord.
pub const INTERACTION_PING: u8 = 1;
/// Interaction type: slash command invocation.
pub const INTERACTION_APPLICATION_COMMAND: u8 = 2;

/// Response type: acknowledge a PING.
pub const RESPONSE_PONG: u8 = 1;
/// Response type: reply immediately with a message.
pub const RESPONSE_CHANNEL_MESSAGE: u8 = 4;
/// Response type: "thinking..." placeholder, edited later.
pub const RESPONSE_DEFERRED_CHANNEL_MESSAGE: u8 = 5;

/// Message flag: only the invoking user sees the reply.
pub const FLAG_EPHEMERAL: u64 = 1 << 6;

/// Option type for a string argument.
pub const OPTION_STRING: u8 = 3;
/// Command type for a slash command.
pub const COMMAND_CHAT_INPUT: u8 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,
    pub id: String,
    pub application_id: String,
    /// Continuation token used to edit the original response.
    pub token: String,
    pub guild_id: Option<String>,
    pub data: Option<CommandData>,
    /// Present for guild invocations.
    pub member: Option<GuildMember>,
    /// Present for DM invocations.
    pub user: Option<DiscordUser>,
}

impl Interaction {
    /// The invoking user, whether in a guild or a DM.
    pub fn invoker(&self) -> Option<&DiscordUser> {
        self.member.as_ref().and_then(|member| member.user.as_ref()).or(self.user.as_ref())
    }

    /// String value of a named command option.
    pub fn string_option(&self, name: &str) -> Option<&str> {
        self.data
            .as_ref()?
            .options
            .iter()
            .find(|option| option.name == name)
            .and_then(|option| option.value.as_ref())
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuildMember {
    pub user: Option<DiscordUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    pub global_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<InteractionResponseData>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self { kind: RESPONSE_PONG, data: None }
    }

    pub fn deferred() -> Self {
        Self { kind: RESPONSE_DEFERRED_CHANNEL_MESSAGE, data: None }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            kind: RESPONSE_CHANNEL_MESSAGE,
            data: Some(InteractionResponseData {
                content: content.into(),
                flags: Some(FLAG_EPHEMERAL),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionResponseData {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

/// Body for `PATCH .../messages/@original`.
#[derive(Debug, Clone, Serialize)]
pub struct MessageEdit<'a> {
    pub content: &'a str,
}

/// Guild slash command definition for bulk registration.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationCommand {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub description: String,
    pub options: Vec<ApplicationCommandOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationCommandOption {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// The `/ask message:<text>` command.
pub fn ask_command() -> ApplicationCommand {
    ApplicationCommand {
        name: "ask".to_string(),
        kind: COMMAND_CHAT_INPUT,
        description: "Geminiに質問します".to_string(),
        options: vec![ApplicationCommandOption {
            kind: OPTION_STRING,
            name: "message".to_string(),
            description: "質問内容".to_string(),
            required: true,
        }],
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn guild_invocation_exposes_member_and_option() {
        let interaction: Interaction = serde_json::from_value(json!({
            "type": 2,
            "id": "1",
            "application_id": "app",
            "token": "tok",
            "guild_id": "42",
            "data": {"id": "c", "name": "ask", "options": [{"name": "message", "type": 3, "value": "明日の予定は？"}]},
            "member": {"user": {"id": "111", "username": "alice", "global_name": "Alice"}, "roles": []}
        }))
        .unwrap();

        assert_eq!(interaction.kind, INTERACTION_APPLICATION_COMMAND);
        assert_eq!(interaction.string_option("message"), Some("明日の予定は？"));
        assert_eq!(interaction.string_option("missing"), None);
        assert_eq!(interaction.invoker().map(|u| u.id.as_str()), Some("111"));
    }

    #[test]
    fn ephemeral_reply_sets_flag() {
        let value = serde_json::to_value(InteractionResponse::ephemeral("no")).unwrap();
        assert_eq!(value, json!({"type": 4, "data": {"content": "no", "flags": 64}}));
        assert_eq!(serde_json::to_value(InteractionResponse::pong()).unwrap(), json!({"type": 1}));
    }
}
