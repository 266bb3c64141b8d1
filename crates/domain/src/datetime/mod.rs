//! Natural-language datetime normalization.
//!
//! [`normalize_datetime`] turns free-form text such as `"明日19時"`,
//! `"tomorrow 7pm"` or `"2026-02-20 19:30"` into an RFC3339 timestamp with
//! a numeric offset for the requested IANA timezone. [`validate_range`]
//! checks the ordering of two such timestamps.

mod error;
mod grammar;
mod iso;
mod normalizer;
mod range;
mod timezone;
mod vocabulary;

pub use error::{DatetimeError, CANONICAL_EXAMPLE};
pub use normalizer::{
    normalize_datetime, DatetimeNormalizer, MatchResult, NormalizerSettings,
    DEFAULT_ROLLOVER_DAYS, MAX_ROLLOVER_DAYS,
};
pub use range::{parse_iso_instant, validate_range};
pub use timezone::{localize, resolve_timezone};
pub use vocabulary::{RelativeDayWord, Vocabulary};
