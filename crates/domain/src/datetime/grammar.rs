//! Regular-expression grammar for the non-ISO strategies.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::Vocabulary;

/// `YYYY-M-D` or `YYYY/M/D`, optionally followed by ` H` / `TH:MM`.
pub(crate) static ABSOLUTE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<year>[0-9]{4})[-/](?P<month>[0-9]{1,2})[-/](?P<day>[0-9]{1,2})(?:[ T](?P<hour>[0-9]{1,2})(?::(?P<minute>[0-9]{2}))?)?$",
    )
    .expect("ABSOLUTE_DATE should compile - this is a bug")
});

/// `M-D` or `M/D` without a year.
pub(crate) static SHORT_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<month>[0-9]{1,2})[-/](?P<day>[0-9]{1,2})(?:[ T](?P<hour>[0-9]{1,2})(?::(?P<minute>[0-9]{2}))?)?$",
    )
    .expect("SHORT_DATE should compile - this is a bug")
});

/// Calendar components captured by [`ABSOLUTE_DATE`] or [`SHORT_DATE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DateCaptures {
    pub year: Option<i32>,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl DateCaptures {
    pub(crate) fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let year = match caps.name("year") {
            Some(year) => Some(year.as_str().parse().ok()?),
            None => None,
        };
        Some(Self {
            year,
            month: caps.name("month")?.as_str().parse().ok()?,
            day: caps.name("day")?.as_str().parse().ok()?,
            hour: optional_number(caps, "hour")?,
            minute: optional_number(caps, "minute")?,
        })
    }
}

/// Relative-day and time-of-day patterns built from a [`Vocabulary`].
#[derive(Debug, Clone)]
pub(crate) struct Grammar {
    vocabulary: Vocabulary,
    relative: Regex,
    time_only: Regex,
}

impl Grammar {
    pub(crate) fn compile(vocabulary: Vocabulary) -> Result<Self, regex::Error> {
        let time = time_fragment(&vocabulary);
        let days = alternation(vocabulary.day_words.iter().map(|w| w.word.as_str()));
        let connectors = alternation(vocabulary.connectors.iter().map(String::as_str));

        let relative = Regex::new(&format!(
            r"(?i)^(?P<day>{days})(?:\s*(?:(?:{connectors})\s*)?{time})?$"
        ))?;
        let time_only = Regex::new(&format!(r"(?i)^{time}$"))?;

        Ok(Self { vocabulary, relative, time_only })
    }

    /// Day offset plus clock time for "明日19時", "tomorrow 7pm", "today".
    pub(crate) fn relative_day(&self, text: &str) -> Option<(i64, u32, u32)> {
        let caps = self.relative.captures(text)?;
        let offset = self.vocabulary.day_offset(caps.name("day")?.as_str())?;
        let (hour, minute) = self.clock_time(&caps)?;
        Some((offset, hour, minute))
    }

    /// Clock time for "19:30", "7pm", "午後7時15分".
    pub(crate) fn time_only(&self, text: &str) -> Option<(u32, u32)> {
        let caps = self.time_only.captures(text)?;
        caps.name("hour")?;
        self.clock_time(&caps)
    }

    fn clock_time(&self, caps: &Captures<'_>) -> Option<(u32, u32)> {
        let Some(hour) = caps.name("hour") else {
            return Some((0, 0));
        };
        let mut hour: u32 = hour.as_str().parse().ok()?;
        let minute = match caps.name("colon_minute").or_else(|| caps.name("word_minute")) {
            Some(minute) => minute.as_str().parse().ok()?,
            None => 0,
        };

        if let Some(marker) = caps.name("pre").or_else(|| caps.name("post")) {
            if hour > 12 {
                return None;
            }
            if self.vocabulary.is_pm(marker.as_str()) && hour < 12 {
                hour += 12;
            } else if self.vocabulary.is_am(marker.as_str()) && hour == 12 {
                hour = 0;
            }
        }

        (hour < 24 && minute < 60).then_some((hour, minute))
    }
}

fn time_fragment(vocabulary: &Vocabulary) -> String {
    let meridiem =
        alternation(vocabulary.am_markers.iter().chain(&vocabulary.pm_markers).map(String::as_str));
    let hour_words = alternation(vocabulary.hour_markers.iter().map(String::as_str));
    let minute_words = alternation(vocabulary.minute_markers.iter().map(String::as_str));

    format!(
        r"(?:(?P<pre>{meridiem})\s*)?(?P<hour>[0-9]{{1,2}})(?:\s*(?::(?P<colon_minute>[0-9]{{2}})|(?:{hour_words})(?:\s*(?P<word_minute>[0-9]{{1,2}})\s*(?:{minute_words})?)?))?(?:\s*(?P<post>{meridiem}))?"
    )
}

/// Escaped, longest-first alternation. An empty list never matches.
fn alternation<'a>(words: impl Iterator<Item = &'a str>) -> String {
    let mut words: Vec<&str> = words.filter(|word| !word.trim().is_empty()).collect();
    if words.is_empty() {
        return r"[^\s\S]".to_string();
    }
    words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    words.into_iter().map(|word| regex::escape(word.trim())).collect::<Vec<_>>().join("|")
}

fn optional_number(caps: &Captures<'_>, name: &str) -> Option<u32> {
    match caps.name(name) {
        Some(value) => value.as_str().parse().ok(),
        None => Some(0),
    }
}
