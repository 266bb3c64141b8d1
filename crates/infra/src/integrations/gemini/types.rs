//! Gemini API types
use famcal_domain::{ConversationTurn, FamcalError};
use serde::{Deserialize, Serialize};

/// Gemini API error types
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// Network-level error (connection failed, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// API key rejected
    #[error("Gemini API authentication failed {status}: {message}")]
    Authentication { status: u16, message: String },

    /// Quota or rate limit exceeded
    #[error("Gemini API rate limit exceeded: {0}")]
    RateLimit(String),

    /// Any other non-success status
    #[error("Gemini API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Gemini API returned no candidates.")]
    NoCandidates,

    #[error("Gemini API returned empty text.")]
    EmptyText,

    /// Response body doesn't match expected schema
    #[error("Invalid response schema: {0}")]
    InvalidSchema(String),
}

impl From<GeminiError> for FamcalError {
    fn from(value: GeminiError) -> Self {
        match value {
            GeminiError::Network(msg) => FamcalError::Network(msg),
            err @ GeminiError::Authentication { .. } => FamcalError::Auth(err.to_string()),
            other => FamcalError::Generation(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TextPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SystemInstruction {
    pub parts: Vec<TextPart>,
}

/// Enables grounding with Google Search.
#[derive(Debug, Serialize)]
pub(crate) struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
pub(crate) struct GoogleSearch {}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest<'a> {
    pub system_instruction: SystemInstruction,
    pub contents: Vec<&'a ConversationTurn>,
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// Parts without text (function calls, inline data) are skipped.
#[derive(Debug, Deserialize)]
pub(crate) struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Non-empty trimmed text parts of the first candidate, joined by `\n`.
    pub(crate) fn into_text(self) -> Result<String, GeminiError> {
        let candidate = self.candidates.into_iter().next().ok_or(GeminiError::NoCandidates)?;
        let combined = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if combined.is_empty() {
            return Err(GeminiError::EmptyText);
        }
        Ok(combined)
    }
}
