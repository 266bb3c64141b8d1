//! Gemini API client implementing the `TextGenerator` port
use async_trait::async_trait;
use famcal_core::TextGenerator;
use famcal_domain::constants::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use famcal_domain::{ConversationTurn, FamcalError, Result};
use reqwest::Method;
use tracing::{debug, info, instrument};

use super::types::{
    GeminiError, GenerateContentRequest, GenerateContentResponse, GoogleSearch,
    SystemInstruction, TextPart, Tool,
};
use crate::http::HttpClient;

/// Gemini `generateContent` client with a fixed system prompt
pub struct GeminiClient {
    http_client: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
    system_prompt: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Arguments
    /// * `api_key` - Generative Language API key
    /// * `system_prompt` - Sent as `system_instruction` on every call
    /// * `http_client` - HTTP client with retry logic
    pub fn new(
        api_key: impl Into<String>,
        system_prompt: impl Into<String>,
        http_client: HttpClient,
    ) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            system_prompt: system_prompt.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API root, e.g. for a proxy or a mock server
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Call `generateContent` with the history followed by `prompt`
    ///
    /// # Errors
    /// Returns `GeminiError` for network failures, any status >= 400, or a
    /// response without usable text
    #[instrument(skip_all, fields(model = %self.model, history_len = history.len()))]
    pub async fn generate_content(
        &self,
        prompt: &str,
        history: &[ConversationTurn],
    ) -> std::result::Result<String, GeminiError> {
        let user_turn = ConversationTurn::user(prompt);
        let payload = GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![TextPart { text: self.system_prompt.clone() }],
            },
            contents: history.iter().chain(std::iter::once(&user_turn)).collect(),
            tools: vec![Tool { google_search: GoogleSearch {} }],
        };

        let request_builder = self
            .http_client
            .request(Method::POST, self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&payload);

        let response = self.http_client.send(request_builder).await.map_err(|err| match err {
            FamcalError::Network(msg) => GeminiError::Network(msg),
            other => GeminiError::Network(format!("HTTP error: {other}")),
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), "Received Gemini API response");

        if status.is_client_error() || status.is_server_error() {
            return Err(self.handle_error_status(status.as_u16(), response).await);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::InvalidSchema(format!("Failed to parse response: {e}")))?;

        let text = body.into_text()?;
        info!(chars = text.chars().count(), "Gemini generation complete");
        Ok(text)
    }

    async fn handle_error_status(&self, status: u16, response: reqwest::Response) -> GeminiError {
        let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

        match status {
            401 | 403 => GeminiError::Authentication { status, message },
            429 => GeminiError::RateLimit(message),
            _ => GeminiError::Api { status, message },
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, history: &[ConversationTurn]) -> Result<String> {
        Ok(self.generate_content(prompt, history).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_client(base_url: String) -> GeminiClient {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(5))
            .max_attempts(1) // No retries in tests
            .build()
            .expect("http client");

        GeminiClient::new("test-api-key", "system prompt", http_client).with_base_url(base_url)
    }

    #[tokio::test]
    async fn generates_text_with_history() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(query_param("key", "test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "system_instruction": {"parts": [{"text": "system prompt"}]},
                "contents": [
                    {"role": "user", "parts": [{"text": "前の質問"}]},
                    {"role": "model", "parts": [{"text": "前の回答"}]},
                    {"role": "user", "parts": [{"text": "今の質問"}]}
                ],
                "tools": [{"google_search": {}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "答えです\n"}]}}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let history = vec![ConversationTurn::user("前の質問"), ConversationTurn::model("前の回答")];

        let answer = client.generate("今の質問", &history).await.expect("should generate");

        assert_eq!(answer, "答えです");
    }

    #[tokio::test]
    async fn error_status_carries_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let err = client.generate_content("hi", &[]).await.unwrap_err();

        match err {
            GeminiError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn handles_authentication_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let result = client.generate("hi", &[]).await;

        assert!(matches!(result, Err(FamcalError::Auth(_))));
    }

    #[tokio::test]
    async fn handles_rate_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let result = client.generate_content("hi", &[]).await;

        assert!(matches!(result, Err(GeminiError::RateLimit(_))));
    }

    #[tokio::test]
    async fn empty_candidates_fail_generation() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let err = client.generate("hi", &[]).await.unwrap_err();

        assert_eq!(err, FamcalError::Generation("Gemini API returned no candidates.".into()));
    }

    #[tokio::test]
    async fn handles_invalid_response_schema() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let result = client.generate_content("hi", &[]).await;

        assert!(matches!(result, Err(GeminiError::InvalidSchema(_))));
    }
}
