//! Start/end ordering check for normalized timestamps.

use chrono::{DateTime, FixedOffset, Utc};

use super::iso::{parse_iso, IsoDatetime};
use super::DatetimeError;

/// Parse an ISO-8601 instant. Text without an offset is read as UTC.
pub fn parse_iso_instant(text: &str) -> Result<DateTime<FixedOffset>, DatetimeError> {
    match parse_iso(text) {
        Some(IsoDatetime::Zoned(dt)) => Ok(dt),
        Some(IsoDatetime::Naive(naive)) => Ok(naive.and_utc().fixed_offset()),
        None => Err(DatetimeError::UnparseableDatetime(text.trim().to_string())),
    }
}

/// Fails with [`DatetimeError::InvalidRange`] unless `end` is strictly after `start`.
pub fn validate_range(start: &str, end: &str) -> Result<(), DatetimeError> {
    let start_at = parse_iso_instant(start)?;
    let end_at = parse_iso_instant(end)?;

    if end_at.with_timezone(&Utc) <= start_at.with_timezone(&Utc) {
        return Err(DatetimeError::InvalidRange {
            start: start.trim().to_string(),
            end: end.trim().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strictly_increasing_range() {
        assert!(validate_range("2026-02-20T19:00:00+09:00", "2026-02-20T20:00:00+09:00").is_ok());
    }

    #[test]
    fn rejects_equal_and_reversed() {
        let equal = validate_range("2026-02-20T19:00:00+09:00", "2026-02-20T19:00:00+09:00");
        let reversed = validate_range("2026-02-20T19:00:00+09:00", "2026-02-20T18:00:00+09:00");

        assert!(matches!(equal, Err(DatetimeError::InvalidRange { .. })));
        assert!(matches!(reversed, Err(DatetimeError::InvalidRange { .. })));
    }

    #[test]
    fn compares_instants_across_offsets() {
        // 10:00Z is 19:00+09:00, so an end of 19:00+09:00 is not after it.
        let same_instant = validate_range("2026-02-20T10:00:00Z", "2026-02-20T19:00:00+09:00");
        assert!(same_instant.is_err());
        assert!(validate_range("2026-02-20T10:00:00Z", "2026-02-20T19:01:00+09:00").is_ok());
    }

    #[test]
    fn unparseable_bounds_are_reported() {
        let err = validate_range("banana", "2026-02-20T19:00:00+09:00").unwrap_err();
        assert_eq!(err, DatetimeError::UnparseableDatetime("banana".into()));
    }

    #[test]
    fn range_error_message_is_user_facing() {
        let err = validate_range("2026-02-20T19:00:00+09:00", "2026-02-20T19:00:00+09:00")
            .unwrap_err();
        assert!(err.to_string().starts_with("終了日時は開始日時より後にしてください。"));
    }
}
