use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use famcal_core::CalendarBackend;
use famcal_domain::{
    CalendarEvent, EventPatch, EventQuery, FamcalError, NewEvent, Result as DomainResult,
};

/// Calls observed by [`MockCalendarBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    List(EventQuery),
    Create(NewEvent),
    Update(String, EventPatch),
    Delete(String),
}

/// In-memory mock for `CalendarBackend`.
///
/// `list_events` returns the seeded events regardless of the query; writes
/// echo back a synthetic event. Every call is recorded.
#[derive(Default, Clone)]
pub struct MockCalendarBackend {
    events: Arc<Mutex<Vec<CalendarEvent>>>,
    calls: Arc<Mutex<Vec<BackendCall>>>,
    fail_with: Arc<Mutex<Option<FamcalError>>>,
}

impl MockCalendarBackend {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self { events: Arc::new(Mutex::new(events)), ..Self::default() }
    }

    /// Make every subsequent call fail with `error`.
    pub fn failing(self, error: FamcalError) -> Self {
        *self.fail_with.lock().unwrap() = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: BackendCall) -> DomainResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail_with.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CalendarBackend for MockCalendarBackend {
    async fn list_events(&self, query: EventQuery) -> DomainResult<Vec<CalendarEvent>> {
        self.record(BackendCall::List(query))?;
        Ok(self.events.lock().unwrap().clone())
    }

    async fn create_event(&self, event: NewEvent) -> DomainResult<CalendarEvent> {
        self.record(BackendCall::Create(event.clone()))?;
        Ok(CalendarEvent::new("created-1", event.summary)
            .with_times(event.start.date_time, event.end.date_time))
    }

    async fn update_event(&self, event_id: &str, patch: EventPatch) -> DomainResult<CalendarEvent> {
        self.record(BackendCall::Update(event_id.to_string(), patch.clone()))?;
        Ok(CalendarEvent::new(event_id, patch.summary.unwrap_or_default()))
    }

    async fn delete_event(&self, event_id: &str) -> DomainResult<()> {
        self.record(BackendCall::Delete(event_id.to_string()))
    }
}
