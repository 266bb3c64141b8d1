//! Errors raised while normalizing or validating datetimes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical accepted form echoed back when nothing could be parsed.
pub const CANONICAL_EXAMPLE: &str = "2026-02-20T19:30:00+09:00";

/// Caller-input errors. None of these are retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatetimeError {
    #[error("日時が空です。")]
    EmptyInput,

    #[error("タイムゾーンが不正です: {0}")]
    InvalidTimeZone(String),

    #[error("日時形式が不正です。ISO8601/RFC3339形式 (例: {example}) で指定してください: {0}", example = CANONICAL_EXAMPLE)]
    UnparseableDatetime(String),

    #[error("終了日時は開始日時より後にしてください。 (開始: {start}, 終了: {end})")]
    InvalidRange { start: String, end: String },
}
