//! Calendar service - turns parsed intents into backend calls

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, SecondsFormat, Utc};
use famcal_domain::constants::{
    DEFAULT_EVENT_DURATION_MINUTES, DEFAULT_LIST_MAX_RESULTS, EVENT_SEARCH_LOOKAHEAD_DAYS,
    EVENT_SEARCH_LOOKBACK_DAYS, EVENT_SEARCH_MAX_RESULTS, MAX_LIST_RESULTS,
};
use famcal_domain::datetime::{
    parse_iso_instant, resolve_timezone, validate_range, DatetimeNormalizer,
};
use famcal_domain::{
    CalendarAction, CalendarEvent, CalendarIntent, CalendarOutcome, EventPatch, EventQuery,
    EventTime, FamcalError, IntentArgs, NewEvent, Result,
};
use tracing::{debug, info, instrument};

use super::ports::CalendarBackend;

const MSG_TARGET_REQUIRED: &str = "event_id か query のどちらかが必要です。";
const MSG_NOT_FOUND: &str = "該当する予定が見つかりませんでした。";
const MSG_AMBIGUOUS: &str = "候補が複数あるため特定できません。event_id を指定してください。";
const MSG_MISSING_ID: &str = "予定IDの取得に失敗しました。";
const MSG_NOTHING_TO_UPDATE: &str = "更新内容が指定されていません。";
const MSG_SUMMARY_REQUIRED: &str = "予定のタイトル (summary) が必要です。";
const MSG_START_REQUIRED: &str = "開始日時 (start) が必要です。";

/// Executes calendar intents against a [`CalendarBackend`].
///
/// Every datetime argument is normalized into RFC3339 in the calendar's
/// timezone (or the intent's `timezone` override) before it reaches the
/// backend.
pub struct CalendarService {
    backend: Arc<dyn CalendarBackend>,
    normalizer: Arc<DatetimeNormalizer>,
    timezone: String,
    fixed_now: Option<DateTime<FixedOffset>>,
}

impl CalendarService {
    /// Create a service for a calendar displayed in `timezone`.
    ///
    /// # Errors
    /// Returns `FamcalError::Config` when `timezone` is not an IANA name.
    pub fn new(
        backend: Arc<dyn CalendarBackend>,
        normalizer: Arc<DatetimeNormalizer>,
        timezone: impl Into<String>,
    ) -> Result<Self> {
        let timezone = timezone.into();
        resolve_timezone(&timezone)
            .map_err(|e| FamcalError::Config(format!("calendar timezone: {e}")))?;
        Ok(Self { backend, normalizer, timezone, fixed_now: None })
    }

    /// Pin "now" for relative expressions and search windows.
    pub fn with_fixed_now(mut self, now: DateTime<FixedOffset>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Current instant in the calendar's timezone.
    pub fn now(&self) -> DateTime<FixedOffset> {
        if let Some(now) = self.fixed_now {
            return now;
        }
        match resolve_timezone(&self.timezone) {
            Ok(tz) => Utc::now().with_timezone(&tz).fixed_offset(),
            Err(_) => Utc::now().fixed_offset(),
        }
    }

    /// Run one intent.
    #[instrument(skip(self, intent), fields(action = %intent.action))]
    pub async fn execute(&self, intent: &CalendarIntent) -> Result<CalendarOutcome> {
        let args = &intent.args;
        match intent.action {
            CalendarAction::List => {
                Ok(CalendarOutcome::Listed { events: self.list_events(args).await? })
            }
            CalendarAction::Create => {
                Ok(CalendarOutcome::Created { event: self.create_event(args).await? })
            }
            CalendarAction::Update => {
                Ok(CalendarOutcome::Updated { event: self.update_event(args).await? })
            }
            CalendarAction::Delete => {
                Ok(CalendarOutcome::Deleted { event_id: self.delete_event(args).await? })
            }
        }
    }

    /// List events; `max_results` is clamped to `1..=20` (default 10).
    pub async fn list_events(&self, args: &IntentArgs) -> Result<Vec<CalendarEvent>> {
        let tz = self.zone_for(args);
        let query = EventQuery {
            time_min: self.normalize_optional(args.time_min.as_deref(), tz)?,
            time_max: self.normalize_optional(args.time_max.as_deref(), tz)?,
            query: args.query.clone(),
            max_results: args
                .max_results
                .unwrap_or(DEFAULT_LIST_MAX_RESULTS)
                .clamp(1, MAX_LIST_RESULTS),
        };

        let events = self.backend.list_events(query).await?;
        info!(count = events.len(), "Listed calendar events");
        Ok(events)
    }

    /// Create an event. Without `end`, the event lasts one hour.
    pub async fn create_event(&self, args: &IntentArgs) -> Result<CalendarEvent> {
        let tz = self.zone_for(args);
        let summary = args
            .summary
            .clone()
            .ok_or_else(|| FamcalError::Calendar(MSG_SUMMARY_REQUIRED.to_string()))?;
        let start_text = args
            .start
            .as_deref()
            .ok_or_else(|| FamcalError::Calendar(MSG_START_REQUIRED.to_string()))?;

        let start = self.normalize(start_text, tz)?;
        let end = match args.end.as_deref() {
            Some(end) => self.normalize(end, tz)?,
            None => default_end(&start)?,
        };
        validate_range(&start, &end)?;

        let event = NewEvent {
            summary,
            start: EventTime::new(start, tz),
            end: EventTime::new(end, tz),
            description: args.description.clone(),
            location: args.location.clone(),
        };
        let created = self.backend.create_event(event).await?;
        info!(event_id = ?created.id, "Created calendar event");
        Ok(created)
    }

    /// Patch an event found by `event_id` or `query`.
    pub async fn update_event(&self, args: &IntentArgs) -> Result<CalendarEvent> {
        let tz = self.zone_for(args);
        let start = self.normalize_optional(args.start.as_deref(), tz)?;
        let end = self.normalize_optional(args.end.as_deref(), tz)?;
        if let (Some(start), Some(end)) = (&start, &end) {
            validate_range(start, end)?;
        }

        let patch = EventPatch {
            summary: args.summary.clone(),
            start: start.map(|value| EventTime::new(value, tz)),
            end: end.map(|value| EventTime::new(value, tz)),
            description: args.description.clone(),
            location: args.location.clone(),
        };
        if patch.is_empty() {
            return Err(FamcalError::Calendar(MSG_NOTHING_TO_UPDATE.to_string()));
        }

        let event_id = self.resolve_event_id(args).await?;
        let updated = self.backend.update_event(&event_id, patch).await?;
        info!(%event_id, "Updated calendar event");
        Ok(updated)
    }

    /// Delete an event found by `event_id` or `query`; returns its id.
    pub async fn delete_event(&self, args: &IntentArgs) -> Result<String> {
        let event_id = self.resolve_event_id(args).await?;
        self.backend.delete_event(&event_id).await?;
        info!(%event_id, "Deleted calendar event");
        Ok(event_id)
    }

    /// Pick the single event an update/delete refers to.
    ///
    /// Searches `[now - 30d, now + 365d]` unless the intent narrows the
    /// window, and requires exactly one hit.
    pub async fn resolve_event_id(&self, args: &IntentArgs) -> Result<String> {
        if let Some(event_id) = &args.event_id {
            return Ok(event_id.clone());
        }
        let query = args
            .query
            .clone()
            .ok_or_else(|| FamcalError::Calendar(MSG_TARGET_REQUIRED.to_string()))?;

        let tz = self.zone_for(args);
        let now = self.now().with_timezone(&Utc);
        let time_min = match self.normalize_optional(args.time_min.as_deref(), tz)? {
            Some(value) => value,
            None => rfc3339_utc(now - Duration::days(EVENT_SEARCH_LOOKBACK_DAYS)),
        };
        let time_max = match self.normalize_optional(args.time_max.as_deref(), tz)? {
            Some(value) => value,
            None => rfc3339_utc(now + Duration::days(EVENT_SEARCH_LOOKAHEAD_DAYS)),
        };

        debug!(%query, %time_min, %time_max, "Searching for target event");
        let events = self
            .backend
            .list_events(EventQuery {
                time_min: Some(time_min),
                time_max: Some(time_max),
                query: Some(query),
                max_results: EVENT_SEARCH_MAX_RESULTS,
            })
            .await?;

        match events.as_slice() {
            [] => Err(FamcalError::Calendar(MSG_NOT_FOUND.to_string())),
            [only] => only.id.clone().ok_or_else(|| FamcalError::Calendar(MSG_MISSING_ID.into())),
            many => {
                let candidates =
                    many.iter().map(CalendarEvent::label).collect::<Vec<_>>().join(" / ");
                Err(FamcalError::Calendar(format!("{MSG_AMBIGUOUS} 候補: {candidates}")))
            }
        }
    }

    fn zone_for<'a>(&'a self, args: &'a IntentArgs) -> &'a str {
        args.timezone.as_deref().unwrap_or(&self.timezone)
    }

    /// "Today" is taken on the wall clock of `tz`, not the calendar's zone.
    fn normalize(&self, text: &str, tz: &str) -> Result<String> {
        let reference = self.now().with_timezone(&resolve_timezone(tz)?).fixed_offset();
        Ok(self.normalizer.normalize(text, tz, Some(reference))?)
    }

    fn normalize_optional(&self, text: Option<&str>, tz: &str) -> Result<Option<String>> {
        text.map(|value| self.normalize(value, tz)).transpose()
    }
}

fn default_end(start: &str) -> Result<String> {
    let start = parse_iso_instant(start)?;
    let end = start + Duration::minutes(DEFAULT_EVENT_DURATION_MINUTES);
    Ok(end.to_rfc3339_opts(SecondsFormat::Secs, false))
}

fn rfc3339_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
