//! IANA timezone resolution and wall-clock localization.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use super::DatetimeError;

/// Resolve an IANA timezone name (e.g. `"Asia/Tokyo"`).
pub fn resolve_timezone(name: &str) -> Result<Tz, DatetimeError> {
    let trimmed = name.trim();
    trimmed.parse::<Tz>().map_err(|_| DatetimeError::InvalidTimeZone(trimmed.to_string()))
}

/// Attach `tz` to a wall-clock time.
///
/// Ambiguous times (clocks turned back) resolve to the earlier instant.
/// Times inside a spring-forward gap are moved forward by one hour.
pub fn localize(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => tz.from_local_datetime(&(naive + Duration::hours(1))).earliest(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn resolves_known_names() {
        assert_eq!(resolve_timezone("Asia/Tokyo").unwrap(), chrono_tz::Asia::Tokyo);
        assert_eq!(resolve_timezone("  UTC ").unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = resolve_timezone("Mars/Olympus").unwrap_err();
        assert_eq!(err, DatetimeError::InvalidTimeZone("Mars/Olympus".into()));
    }

    #[test]
    fn gap_times_shift_forward() {
        let tz = chrono_tz::America::New_York;
        // 2026-03-08 02:30 does not exist in New York.
        let dt = localize(&tz, naive(2026, 3, 8, 2, 30)).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-03-08T03:30:00-04:00");
    }

    #[test]
    fn ambiguous_times_take_earliest() {
        let tz = chrono_tz::America::New_York;
        let dt = localize(&tz, naive(2026, 11, 1, 1, 30)).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-11-01T01:30:00-04:00");
    }
}
