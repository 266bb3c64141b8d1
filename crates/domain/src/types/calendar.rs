//! Calendar event types exchanged between the service and the backend.

use serde::{Deserialize, Serialize};

use crate::constants::UNTITLED_EVENT;

/// Event as summarised from the calendar provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Missing only when the provider returns a malformed event.
    pub id: Option<String>,
    pub summary: String,
    /// `dateTime` for timed events, `date` for all-day events.
    pub start: Option<String>,
    pub end: Option<String>,
    pub html_link: Option<String>,
}

impl CalendarEvent {
    pub fn new(id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            summary: summary.into(),
            start: None,
            end: None,
            html_link: None,
        }
    }

    pub fn with_times(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self.end = Some(end.into());
        self
    }

    /// `summary (start)`, used when listing ambiguous search hits.
    pub fn label(&self) -> String {
        let summary = if self.summary.is_empty() { UNTITLED_EVENT } else { &self.summary };
        format!("{summary} ({})", self.start.as_deref().unwrap_or_default())
    }
}

/// Wall-clock instant plus the zone the provider should display it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTime {
    pub date_time: String,
    pub time_zone: String,
}

impl EventTime {
    pub fn new(date_time: impl Into<String>, time_zone: impl Into<String>) -> Self {
        Self { date_time: date_time.into(), time_zone: time_zone.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    pub summary: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.description.is_none()
            && self.location.is_none()
    }
}

/// Search window and filters for listing events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQuery {
    pub time_min: Option<String>,
    pub time_max: Option<String>,
    /// Free-text search across event fields.
    pub query: Option<String>,
    pub max_results: u32,
}

/// Result of executing one calendar intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum CalendarOutcome {
    Listed { events: Vec<CalendarEvent> },
    Created { event: CalendarEvent },
    Updated { event: CalendarEvent },
    Deleted { event_id: String },
}
