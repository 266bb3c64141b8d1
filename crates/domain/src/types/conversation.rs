//! Conversation turns in the shape the text generator consumes.

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

impl_domain_status_conversions!(TurnRole {
    User => "user",
    Model => "model",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPart {
    pub text: String,
}

/// One message in a user's history, e.g.
/// `{"role": "user", "parts": [{"text": "..."}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub parts: Vec<TurnPart>,
}

impl ConversationTurn {
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self { role, parts: vec![TurnPart { text: text.into() }] }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(TurnRole::Model, text)
    }

    /// All parts joined with newlines.
    pub fn text(&self) -> String {
        self.parts.iter().map(|part| part.text.as_str()).collect::<Vec<_>>().join("\n")
    }
}
