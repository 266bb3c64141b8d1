//! ISO-8601 / RFC3339 parsing shared by the normalizer and the range check.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Offset-carrying layouts tried after RFC3339 proper.
const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
];

/// Layouts without any zone information.
const NAIVE_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Outcome of an ISO parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IsoDatetime {
    /// The text carried `Z` or a numeric offset.
    Zoned(DateTime<FixedOffset>),
    /// No zone information; the caller attaches one.
    Naive(NaiveDateTime),
}

pub(crate) fn parse_iso(text: &str) -> Option<IsoDatetime> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(IsoDatetime::Zoned(dt));
    }

    let zulu_replaced = text
        .strip_suffix('Z')
        .or_else(|| text.strip_suffix('z'))
        .map(|stripped| format!("{stripped}+00:00"));
    let zoned_candidate = zulu_replaced.as_deref().unwrap_or(text);

    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(zoned_candidate, format) {
            return Some(IsoDatetime::Zoned(dt));
        }
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(IsoDatetime::Naive)
}
