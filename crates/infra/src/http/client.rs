//! HTTP client shared by the Gemini, Google and Discord adapters.
//!
//! Only idempotent methods are retried. A `POST` that times out may still
//! have been applied upstream (a calendar insert, a generated reply), so it
//! gets exactly one attempt.

use std::time::Duration;

use famcal_domain::FamcalError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// When and how often a request may be sent again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
    base_backoff: Duration,
}

impl RetryPolicy {
    /// Backoff doubles per retry up to this many doublings.
    const MAX_DOUBLINGS: u32 = 6;

    pub fn new(max_attempts: usize, base_backoff: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_backoff }
    }

    /// A policy that never retries.
    pub fn single_attempt() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// `GET`, `HEAD`, `OPTIONS`, `PUT` and `DELETE` can be repeated safely.
    pub fn is_replayable(method: &Method) -> bool {
        matches!(method.as_str(), "GET" | "HEAD" | "OPTIONS" | "PUT" | "DELETE")
    }

    /// Attempts allowed for `method`, counting the first one.
    pub fn attempts_for(&self, method: &Method) -> usize {
        if Self::is_replayable(method) {
            self.max_attempts
        } else {
            1
        }
    }

    /// Pause before retry number `retry` (1-based).
    pub fn delay(&self, retry: usize) -> Duration {
        let doublings = u32::try_from(retry.saturating_sub(1))
            .unwrap_or(Self::MAX_DOUBLINGS)
            .min(Self::MAX_DOUBLINGS);
        self.base_backoff.saturating_mul(1 << doublings)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200))
    }
}

/// Thin wrapper over `reqwest` adding timeouts and the [`RetryPolicy`].
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with a 30 second timeout and the default retry policy.
    pub fn new() -> Result<Self, FamcalError> {
        Self::builder().build()
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send `builder`, retrying 5xx responses and transport failures when
    /// the method is replayable.
    ///
    /// A 5xx on the last allowed attempt is returned as a response, not an
    /// error, so adapters can read the upstream error body.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, FamcalError> {
        let request = builder.build().map_err(transport_error)?;
        let attempts = self.retry.attempts_for(request.method());

        let mut pending = request;
        for attempt in 1..=attempts {
            let last = attempt == attempts;
            // Keep a copy for the next round; streaming bodies cannot be copied.
            let spare = if last { None } else { pending.try_clone() };
            let method = pending.method().clone();
            let url = pending.url().clone();
            debug!(attempt, %method, %url, "sending HTTP request");

            let outcome = self.client.execute(pending).await;
            let Some(next) = spare else {
                return outcome.map_err(transport_error);
            };

            match outcome {
                Ok(response) if response.status().is_server_error() => {
                    warn!(attempt, %method, %url, status = %response.status(), "retrying after server error");
                }
                Ok(response) => {
                    debug!(attempt, %method, %url, status = %response.status(), "received HTTP response");
                    return Ok(response);
                }
                Err(err) if is_transient(&err) => {
                    warn!(attempt, %method, %url, error = %err, "retrying after transport error");
                }
                Err(err) => return Err(transport_error(err)),
            }

            let delay = self.retry.delay(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            pending = next;
        }

        Err(FamcalError::Internal("retry loop ended without a response".into()))
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    retry: RetryPolicy,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts for replayable methods (first try included).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.retry = RetryPolicy::new(attempts, self.retry.base_backoff);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.retry = RetryPolicy::new(self.retry.max_attempts, backoff);
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, FamcalError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(transport_error)?;
        Ok(HttpClient { client, retry: self.retry })
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

fn transport_error(err: reqwest::Error) -> FamcalError {
    InfraError::from(err).into()
}
