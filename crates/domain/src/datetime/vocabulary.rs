//! Locale word lists used by the relative-day and time-of-day grammar.

use serde::{Deserialize, Serialize};

/// A word naming a day relative to the reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeDayWord {
    pub word: String,
    pub day_offset: i64,
}

impl RelativeDayWord {
    pub fn new(word: impl Into<String>, day_offset: i64) -> Self {
        Self { word: word.into(), day_offset }
    }
}

/// Words recognised around relative days and clock times.
///
/// Matching is case-insensitive. Words are tried longest first, so
/// "the day after tomorrow" wins over "tomorrow".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    pub day_words: Vec<RelativeDayWord>,
    /// Words allowed between the day word and the time ("at", "の").
    #[serde(default)]
    pub connectors: Vec<String>,
    pub hour_markers: Vec<String>,
    pub minute_markers: Vec<String>,
    #[serde(default)]
    pub am_markers: Vec<String>,
    #[serde(default)]
    pub pm_markers: Vec<String>,
}

impl Vocabulary {
    pub fn japanese() -> Self {
        Self {
            day_words: vec![
                RelativeDayWord::new("今日", 0),
                RelativeDayWord::new("本日", 0),
                RelativeDayWord::new("明日", 1),
                RelativeDayWord::new("あした", 1),
                RelativeDayWord::new("明後日", 2),
                RelativeDayWord::new("あさって", 2),
            ],
            connectors: strings(&["の"]),
            hour_markers: strings(&["時"]),
            minute_markers: strings(&["分"]),
            am_markers: strings(&["午前"]),
            pm_markers: strings(&["午後"]),
        }
    }

    pub fn english() -> Self {
        Self {
            day_words: vec![
                RelativeDayWord::new("today", 0),
                RelativeDayWord::new("tomorrow", 1),
                RelativeDayWord::new("the day after tomorrow", 2),
            ],
            connectors: strings(&["at"]),
            hour_markers: strings(&["o'clock", "h"]),
            minute_markers: strings(&["minutes", "minute", "min"]),
            am_markers: strings(&["a.m.", "am"]),
            pm_markers: strings(&["p.m.", "pm"]),
        }
    }

    /// Look up a built-in vocabulary by locale tag (`"ja"`, `"en"`).
    pub fn for_locale(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "ja" | "ja-jp" | "japanese" => Some(Self::japanese()),
            "en" | "en-us" | "en-gb" | "english" => Some(Self::english()),
            _ => None,
        }
    }

    /// Combine vocabularies; later entries never shadow earlier ones.
    pub fn merge(mut self, other: Self) -> Self {
        for word in other.day_words {
            if !self.day_words.iter().any(|w| w.word.eq_ignore_ascii_case(&word.word)) {
                self.day_words.push(word);
            }
        }
        extend_unique(&mut self.connectors, other.connectors);
        extend_unique(&mut self.hour_markers, other.hour_markers);
        extend_unique(&mut self.minute_markers, other.minute_markers);
        extend_unique(&mut self.am_markers, other.am_markers);
        extend_unique(&mut self.pm_markers, other.pm_markers);
        self
    }

    pub fn day_offset(&self, word: &str) -> Option<i64> {
        self.day_words
            .iter()
            .find(|candidate| candidate.word.to_lowercase() == word.to_lowercase())
            .map(|candidate| candidate.day_offset)
    }

    pub fn is_am(&self, marker: &str) -> bool {
        contains_ignore_case(&self.am_markers, marker)
    }

    pub fn is_pm(&self, marker: &str) -> bool {
        contains_ignore_case(&self.pm_markers, marker)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

fn extend_unique(target: &mut Vec<String>, extra: Vec<String>) {
    for value in extra {
        if !contains_ignore_case(target, &value) {
            target.push(value);
        }
    }
}

fn contains_ignore_case(values: &[String], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    values.iter().any(|value| value.to_lowercase() == needle)
}
