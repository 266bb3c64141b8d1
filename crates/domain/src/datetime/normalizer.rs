//! Free-form date/time text → RFC3339 in a target timezone.
//!
//! Strategies are tried in a fixed order and the first match wins:
//!
//! 1. ISO-8601 / RFC3339 (an explicit offset is kept as-is)
//! 2. Absolute calendar date `YYYY-M-D [H[:MM]]`
//! 3. Short date `M-D [H[:MM]]` with year inference
//! 4. Relative day word plus optional time (`明日19時`, `tomorrow 7pm`)
//! 5. Bare time of day (`19:30`, `午後7時`)
//!
//! Strategies 2–5 build a wall-clock time in the target zone, so the offset
//! of the result is the one in force on that date.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc,
};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::grammar::{DateCaptures, Grammar, ABSOLUTE_DATE, SHORT_DATE};
use super::iso::{parse_iso, IsoDatetime};
use super::timezone::{localize, resolve_timezone};
use super::{DatetimeError, Vocabulary};
use crate::errors::{FamcalError, Result};
use crate::utils::text::fold_fullwidth;

/// Default look-back window before a yearless date rolls into next year.
pub const DEFAULT_ROLLOVER_DAYS: i64 = 180;

/// Largest rollover window accepted from configuration.
pub const MAX_ROLLOVER_DAYS: i64 = 3650;

/// Tunables for the locale-specific parts of the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerSettings {
    /// A short date more than this many days before the reference instant
    /// is moved into the following year.
    pub rollover_days: i64,
    pub vocabulary: Vocabulary,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            rollover_days: DEFAULT_ROLLOVER_DAYS,
            vocabulary: Vocabulary::japanese().merge(Vocabulary::english()),
        }
    }
}

/// What a strategy recognised, before it is placed in a timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    IsoTimestamp(DateTime<FixedOffset>),
    AbsoluteDate { year: i32, month: u32, day: u32, hour: u32, minute: u32 },
    RelativeDay { day_offset: i64, hour: u32, minute: u32 },
    TimeOnly { hour: u32, minute: u32 },
}

/// Inputs shared by every strategy for one call.
struct MatchContext<'a> {
    tz: Tz,
    reference: DateTime<FixedOffset>,
    settings: &'a NormalizerSettings,
    grammar: &'a Grammar,
}

type Strategy = fn(&str, &MatchContext<'_>) -> Option<MatchResult>;

/// Ordered strategy chain; evaluation stops at the first `Some`.
const STRATEGIES: [(&str, Strategy); 5] = [
    ("iso", match_iso),
    ("absolute_date", match_absolute_date),
    ("short_date", match_short_date),
    ("relative_day", match_relative_day),
    ("time_only", match_time_only),
];

/// Normalizer bound to one set of [`NormalizerSettings`].
///
/// Holds only compiled patterns; safe to share across threads.
#[derive(Debug, Clone)]
pub struct DatetimeNormalizer {
    settings: NormalizerSettings,
    grammar: Grammar,
}

static DEFAULT_NORMALIZER: Lazy<DatetimeNormalizer> = Lazy::new(|| {
    DatetimeNormalizer::new(NormalizerSettings::default())
        .expect("built-in vocabulary should compile - this is a bug")
});

impl DatetimeNormalizer {
    /// Compile the grammar for `settings`.
    ///
    /// # Errors
    /// Returns `FamcalError::Config` when the vocabulary produces an
    /// invalid pattern.
    pub fn new(settings: NormalizerSettings) -> Result<Self> {
        let grammar = Grammar::compile(settings.vocabulary.clone()).map_err(|err| {
            FamcalError::Config(format!("invalid datetime vocabulary: {err}"))
        })?;
        Ok(Self { settings, grammar })
    }

    /// Shared normalizer with the built-in Japanese + English vocabulary.
    pub fn default_instance() -> &'static Self {
        &DEFAULT_NORMALIZER
    }

    pub fn settings(&self) -> &NormalizerSettings {
        &self.settings
    }

    /// Normalize `text` into RFC3339 anchored to `timezone_name`.
    ///
    /// `reference_now` replaces the system clock as the anchor for relative
    /// and time-only expressions; its own calendar date is used as-is.
    pub fn normalize(
        &self,
        text: &str,
        timezone_name: &str,
        reference_now: Option<DateTime<FixedOffset>>,
    ) -> std::result::Result<String, DatetimeError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DatetimeError::EmptyInput);
        }
        let folded = fold_fullwidth(text);

        let tz = resolve_timezone(timezone_name)?;
        let reference =
            reference_now.unwrap_or_else(|| Utc::now().with_timezone(&tz).fixed_offset());
        let ctx = MatchContext { tz, reference, settings: &self.settings, grammar: &self.grammar };

        let matched = STRATEGIES
            .iter()
            .find_map(|(_, strategy)| strategy(folded.trim(), &ctx))
            .ok_or_else(|| DatetimeError::UnparseableDatetime(text.to_string()))?;

        resolve(matched, &ctx)
            .map(format_rfc3339)
            .ok_or_else(|| DatetimeError::UnparseableDatetime(text.to_string()))
    }

    /// Name of the first strategy that recognises `text`, if any.
    pub fn matching_strategy(
        &self,
        text: &str,
        timezone_name: &str,
        reference_now: DateTime<FixedOffset>,
    ) -> Option<&'static str> {
        let tz = resolve_timezone(timezone_name).ok()?;
        let ctx = MatchContext {
            tz,
            reference: reference_now,
            settings: &self.settings,
            grammar: &self.grammar,
        };
        let folded = fold_fullwidth(text);
        STRATEGIES
            .iter()
            .find(|(_, strategy)| strategy(folded.trim(), &ctx).is_some())
            .map(|(name, _)| *name)
    }
}

/// Normalize with the default settings. See [`DatetimeNormalizer::normalize`].
pub fn normalize_datetime(
    text: &str,
    timezone_name: &str,
    reference_now: Option<DateTime<FixedOffset>>,
) -> std::result::Result<String, DatetimeError> {
    DatetimeNormalizer::default_instance().normalize(text, timezone_name, reference_now)
}

fn match_iso(text: &str, ctx: &MatchContext<'_>) -> Option<MatchResult> {
    match parse_iso(text)? {
        IsoDatetime::Zoned(dt) => Some(MatchResult::IsoTimestamp(dt)),
        IsoDatetime::Naive(naive) => {
            localize(&ctx.tz, naive).map(|dt| MatchResult::IsoTimestamp(dt.fixed_offset()))
        }
    }
}

fn match_absolute_date(text: &str, _ctx: &MatchContext<'_>) -> Option<MatchResult> {
    let caps = ABSOLUTE_DATE.captures(text)?;
    let parts = DateCaptures::from_captures(&caps)?;
    let year = parts.year?;
    calendar_datetime(year, parts.month, parts.day, parts.hour, parts.minute)?;

    Some(MatchResult::AbsoluteDate {
        year,
        month: parts.month,
        day: parts.day,
        hour: parts.hour,
        minute: parts.minute,
    })
}

fn match_short_date(text: &str, ctx: &MatchContext<'_>) -> Option<MatchResult> {
    let caps = SHORT_DATE.captures(text)?;
    let parts = DateCaptures::from_captures(&caps)?;

    let mut year = ctx.reference.year();
    let naive = calendar_datetime(year, parts.month, parts.day, parts.hour, parts.minute)?;
    let candidate = localize(&ctx.tz, naive)?;
    // A window reaching past chrono's range never rolls.
    let threshold = Duration::try_days(ctx.settings.rollover_days)
        .and_then(|window| ctx.reference.checked_sub_signed(window));
    if threshold.is_some_and(|threshold| candidate.fixed_offset() < threshold) {
        year += 1;
        calendar_datetime(year, parts.month, parts.day, parts.hour, parts.minute)?;
    }

    Some(MatchResult::AbsoluteDate {
        year,
        month: parts.month,
        day: parts.day,
        hour: parts.hour,
        minute: parts.minute,
    })
}

fn match_relative_day(text: &str, ctx: &MatchContext<'_>) -> Option<MatchResult> {
    let (day_offset, hour, minute) = ctx.grammar.relative_day(text)?;
    Some(MatchResult::RelativeDay { day_offset, hour, minute })
}

fn match_time_only(text: &str, ctx: &MatchContext<'_>) -> Option<MatchResult> {
    let (hour, minute) = ctx.grammar.time_only(text)?;
    Some(MatchResult::TimeOnly { hour, minute })
}

fn resolve(matched: MatchResult, ctx: &MatchContext<'_>) -> Option<DateTime<FixedOffset>> {
    let naive = match matched {
        MatchResult::IsoTimestamp(dt) => return Some(dt),
        MatchResult::AbsoluteDate { year, month, day, hour, minute } => {
            calendar_datetime(year, month, day, hour, minute)?
        }
        MatchResult::RelativeDay { day_offset, hour, minute } => ctx
            .reference
            .date_naive()
            .checked_add_signed(Duration::try_days(day_offset)?)?
            .and_hms_opt(hour, minute, 0)?,
        MatchResult::TimeOnly { hour, minute } => {
            ctx.reference.date_naive().and_hms_opt(hour, minute, 0)?
        }
    };
    localize(&ctx.tz, naive).map(|dt| dt.fixed_offset())
}

fn calendar_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
}

/// `YYYY-MM-DDTHH:MM:SS±HH:MM`. Sub-second precision is dropped.
fn format_rfc3339(dt: DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}
