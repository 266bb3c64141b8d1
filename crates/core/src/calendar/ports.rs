//! Port interface for the remote calendar
//!
//! The service normalizes and validates everything before calling the
//! backend, so implementations only translate to the provider's wire format.

use async_trait::async_trait;
use famcal_domain::{CalendarEvent, EventPatch, EventQuery, NewEvent, Result};

/// CRUD operations against one calendar
#[async_trait]
pub trait CalendarBackend: Send + Sync {
    /// List events matching the query, ordered by start time
    async fn list_events(&self, query: EventQuery) -> Result<Vec<CalendarEvent>>;

    /// Insert a new event and return it as stored
    async fn create_event(&self, event: NewEvent) -> Result<CalendarEvent>;

    /// Apply a partial update to an existing event
    async fn update_event(&self, event_id: &str, patch: EventPatch) -> Result<CalendarEvent>;

    /// Remove an event
    async fn delete_event(&self, event_id: &str) -> Result<()>;
}
