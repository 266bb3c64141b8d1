//! OAuth2 access tokens for Google Calendar.
//!
//! Exchanges a long-lived refresh token for short-lived access tokens at the
//! Google token endpoint and caches the result until shortly before expiry.

use std::time::{Duration, Instant};

use famcal_domain::{CalendarConfig, FamcalError, Result};
use reqwest::Method;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::http::HttpClient;

const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_REFRESH_THRESHOLD_SECONDS: u64 = 300;

/// Credentials for the refresh-token grant.
#[derive(Debug, Clone)]
pub struct GoogleOAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub token_endpoint: String,
    /// Refresh this many seconds before the cached token expires.
    pub refresh_threshold_seconds: u64,
}

impl GoogleOAuthSettings {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            token_endpoint: GOOGLE_TOKEN_ENDPOINT.to_string(),
            refresh_threshold_seconds: DEFAULT_REFRESH_THRESHOLD_SECONDS,
        }
    }

    pub fn from_config(config: &CalendarConfig) -> Self {
        Self::new(&config.client_id, &config.client_secret, &config.refresh_token)
    }

    pub fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Access-token source with an in-memory cache.
pub struct GoogleTokenSource {
    settings: GoogleOAuthSettings,
    http_client: HttpClient,
    cached: Mutex<Option<CachedToken>>,
}

impl GoogleTokenSource {
    pub fn new(settings: GoogleOAuthSettings, http_client: HttpClient) -> Self {
        Self { settings, http_client, cached: Mutex::new(None) }
    }

    /// Current access token, refreshed when missing or about to expire.
    ///
    /// # Errors
    /// Returns `FamcalError::Auth` when the token endpoint rejects the
    /// refresh token or answers with an unexpected body.
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
            debug!("Cached Google access token is about to expire");
        }

        let fresh = self.refresh().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    /// Drop the cached token so the next call refreshes.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    async fn refresh(&self) -> Result<CachedToken> {
        let request = self.http_client.request(Method::POST, &self.settings.token_endpoint).form(&[
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("refresh_token", self.settings.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ]);

        let response = self
            .http_client
            .send(request)
            .await
            .map_err(|e| FamcalError::Auth(format!("Token refresh request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FamcalError::Auth(format!(
                "Token refresh failed ({status}): {error_text}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| FamcalError::Auth(format!("Failed to parse token response: {e}")))?;

        let lifetime = token.expires_in.saturating_sub(self.settings.refresh_threshold_seconds);
        info!(expires_in = token.expires_in, "Refreshed Google access token");

        Ok(CachedToken {
            access_token: token.access_token,
            refresh_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }
}
