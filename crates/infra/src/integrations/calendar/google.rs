//! Google Calendar adapter for the `CalendarBackend` port

use std::sync::Arc;

use async_trait::async_trait;
use famcal_core::CalendarBackend;
use famcal_domain::{
    CalendarEvent, EventPatch, EventQuery, FamcalError, NewEvent, Result,
};
use reqwest::{Method, RequestBuilder, Response};
use tracing::{debug, instrument, warn};

use super::oauth::GoogleTokenSource;
use super::types::{GoogleEvent, GoogleEventWrite, GoogleEventsResponse};
use crate::http::HttpClient;

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Events API client bound to one calendar.
pub struct GoogleCalendarClient {
    http_client: HttpClient,
    tokens: Arc<GoogleTokenSource>,
    calendar_id: String,
    api_base: String,
}

impl GoogleCalendarClient {
    pub fn new(
        http_client: HttpClient,
        tokens: Arc<GoogleTokenSource>,
        calendar_id: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            tokens,
            calendar_id: calendar_id.into(),
            api_base: GOOGLE_CALENDAR_API_BASE.to_string(),
        }
    }

    /// Point at another API root (tests, proxies).
    pub fn with_api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.api_base, urlencoding::encode(&self.calendar_id))
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), urlencoding::encode(event_id))
    }

    async fn authorized(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let token = self.tokens.access_token().await?;
        Ok(self.http_client.request(method, url).bearer_auth(token))
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response> {
        let response = self.http_client.send(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 401 {
            // Revoked or expired early; force a refresh on the next call.
            self.tokens.invalidate().await;
        }
        let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        warn!(operation, %status, "Google Calendar request failed");
        Err(FamcalError::Calendar(format!(
            "Google Calendar {operation} error ({status}): {body}"
        )))
    }

    async fn read_event(response: Response) -> Result<CalendarEvent> {
        let event: GoogleEvent = response
            .json()
            .await
            .map_err(|e| FamcalError::Calendar(format!("Failed to parse event: {e}")))?;
        Ok(event.into())
    }
}

#[async_trait]
impl CalendarBackend for GoogleCalendarClient {
    #[instrument(skip(self, query), fields(calendar_id = %self.calendar_id))]
    async fn list_events(&self, query: EventQuery) -> Result<Vec<CalendarEvent>> {
        let mut params: Vec<(&str, String)> = vec![
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
            ("maxResults", query.max_results.to_string()),
        ];
        if let Some(time_min) = query.time_min {
            params.push(("timeMin", time_min));
        }
        if let Some(time_max) = query.time_max {
            params.push(("timeMax", time_max));
        }
        if let Some(q) = query.query {
            params.push(("q", q));
        }

        let request = self.authorized(Method::GET, &self.events_url()).await?.query(&params);
        let response = self.send("list", request).await?;
        let page: GoogleEventsResponse = response
            .json()
            .await
            .map_err(|e| FamcalError::Calendar(format!("Failed to parse events response: {e}")))?;

        debug!(count = page.items.len(), "Fetched events from Google Calendar");
        Ok(page.items.into_iter().map(CalendarEvent::from).collect())
    }

    #[instrument(skip(self, event), fields(calendar_id = %self.calendar_id))]
    async fn create_event(&self, event: NewEvent) -> Result<CalendarEvent> {
        let body = GoogleEventWrite::from(event);
        let request = self.authorized(Method::POST, &self.events_url()).await?.json(&body);
        let response = self.send("insert", request).await?;
        Self::read_event(response).await
    }

    #[instrument(skip(self, patch), fields(calendar_id = %self.calendar_id))]
    async fn update_event(&self, event_id: &str, patch: EventPatch) -> Result<CalendarEvent> {
        let body = GoogleEventWrite::from(patch);
        let request =
            self.authorized(Method::PATCH, &self.event_url(event_id)).await?.json(&body);
        let response = self.send("patch", request).await?;
        Self::read_event(response).await
    }

    #[instrument(skip(self), fields(calendar_id = %self.calendar_id))]
    async fn delete_event(&self, event_id: &str) -> Result<()> {
        let request = self.authorized(Method::DELETE, &self.event_url(event_id)).await?;
        self.send("delete", request).await?;
        Ok(())
    }
}
