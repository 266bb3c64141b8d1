//! Google Calendar v3 wire types
//!
//! Only the fields the bot reads or writes are modelled; everything else in
//! the provider's payload is ignored.

use famcal_domain::constants::UNTITLED_EVENT;
use famcal_domain::{CalendarEvent, EventPatch, EventTime, NewEvent};
use serde::{Deserialize, Serialize};

/// `events.list` response page.
#[derive(Debug, Deserialize)]
pub struct GoogleEventsResponse {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
}

/// One event resource as returned by the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub start: Option<GoogleEventDateTime>,
    pub end: Option<GoogleEventDateTime>,
    pub html_link: Option<String>,
}

/// `dateTime` for timed events, `date` for all-day events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventDateTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl GoogleEventDateTime {
    fn value(self) -> Option<String> {
        self.date_time.or(self.date)
    }
}

impl From<EventTime> for GoogleEventDateTime {
    fn from(time: EventTime) -> Self {
        Self { date_time: Some(time.date_time), date: None, time_zone: Some(time.time_zone) }
    }
}

impl From<GoogleEvent> for CalendarEvent {
    fn from(event: GoogleEvent) -> Self {
        Self {
            id: event.id,
            summary: event
                .summary
                .filter(|summary| !summary.is_empty())
                .unwrap_or_else(|| UNTITLED_EVENT.to_string()),
            start: event.start.and_then(GoogleEventDateTime::value),
            end: event.end.and_then(GoogleEventDateTime::value),
            html_link: event.html_link,
        }
    }
}

/// Body for `events.insert` and `events.patch`.
///
/// Absent fields are omitted so a patch leaves them untouched.
#[derive(Debug, Default, Serialize)]
pub struct GoogleEventWrite {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<GoogleEventDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<GoogleEventDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl From<NewEvent> for GoogleEventWrite {
    fn from(event: NewEvent) -> Self {
        Self {
            summary: Some(event.summary),
            start: Some(event.start.into()),
            end: Some(event.end.into()),
            description: event.description,
            location: event.location,
        }
    }
}

impl From<EventPatch> for GoogleEventWrite {
    fn from(patch: EventPatch) -> Self {
        Self {
            summary: patch.summary,
            start: patch.start.map(Into::into),
            end: patch.end.map(Into::into),
            description: patch.description,
            location: patch.location,
        }
    }
}
