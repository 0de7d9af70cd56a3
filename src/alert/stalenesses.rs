/// Pond reading staleness detection.
///
/// The readings API is polled every few seconds. When a probe goes quiet the
/// upstream may keep serving its last value, which looks healthy on a
/// dashboard. Readings that carry an observation time are checked here so the
/// monitor can flag the gap instead of classifying old water.
///
/// # Clock injection
/// `is_stale_at` takes `now: DateTime<Utc>` rather than calling `Utc::now()`
/// internally, which keeps the tests deterministic.

use chrono::{DateTime, Utc};

use crate::model::{DrFishError, WaterReadings};

// ---------------------------------------------------------------------------
// Staleness check
// ---------------------------------------------------------------------------

/// Age of a reading in whole minutes relative to `now`.
///
/// Returns `Ok(None)` for readings without an observation time; the readings
/// API stamps nothing, so those are taken as observed at fetch time.
pub fn age_minutes_at(
    readings: &WaterReadings,
    now: DateTime<Utc>,
) -> Result<Option<u64>, DrFishError> {
    let Some(raw) = readings.observed_at.as_deref() else {
        return Ok(None);
    };
    let observed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| DrFishError::ParseError(format!("observed_at '{}': {}", raw, e)))?
        .with_timezone(&Utc);
    // Readings from the future (clock skew) count as zero minutes old.
    Ok(Some((now - observed).num_minutes().max(0) as u64))
}

/// Returns `true` if the reading is older than `max_age_minutes`.
///
/// Staleness is strictly greater than the threshold:
///   age > max_age_minutes  →  stale
///   age == max_age_minutes →  not stale
///
/// Returns an error if `observed_at` cannot be parsed. Callers should treat
/// parse failures as stale.
pub fn is_stale_at(
    readings: &WaterReadings,
    max_age_minutes: u64,
    now: DateTime<Utc>,
) -> Result<bool, DrFishError> {
    Ok(age_minutes_at(readings, now)?.is_some_and(|age| age > max_age_minutes))
}

/// Convenience wrapper that uses the real current time.
pub fn is_stale(readings: &WaterReadings, max_age_minutes: u64) -> Result<bool, DrFishError> {
    is_stale_at(readings, max_age_minutes, Utc::now())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reading_at(datetime: &str) -> WaterReadings {
        let mut r = WaterReadings::new(12.0, 9.0, 7.5, 150.0);
        r.observed_at = Some(datetime.to_string());
        r
    }

    /// A fixed "now" used across all tests: 2024-05-01 13:00:00 UTC.
    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap()
    }

    // --- Not stale ----------------------------------------------------------

    #[test]
    fn test_reading_5_minutes_old_is_not_stale() {
        let reading = reading_at("2024-05-01T12:55:00+00:00");
        let stale = is_stale_at(&reading, 15, fixed_now()).expect("valid datetime");
        assert!(!stale);
    }

    #[test]
    fn test_reading_exactly_at_threshold_is_not_stale() {
        let reading = reading_at("2024-05-01T12:45:00+00:00");
        let stale = is_stale_at(&reading, 15, fixed_now()).expect("valid datetime");
        assert!(!stale, "age == threshold is not stale (strictly greater than)");
    }

    #[test]
    fn test_reading_with_offset_parsed_correctly() {
        // 18:30 at +05:30 == 13:00Z, zero minutes old.
        let reading = reading_at("2024-05-01T18:30:00+05:30");
        assert_eq!(age_minutes_at(&reading, fixed_now()), Ok(Some(0)));
    }

    #[test]
    fn test_untimestamped_reading_is_never_stale() {
        let reading = WaterReadings::new(12.0, 9.0, 7.5, 150.0);
        assert_eq!(is_stale_at(&reading, 0, fixed_now()), Ok(false));
    }

    #[test]
    fn test_future_reading_counts_as_fresh() {
        let reading = reading_at("2024-05-01T14:00:00Z");
        assert_eq!(age_minutes_at(&reading, fixed_now()), Ok(Some(0)));
    }

    // --- Stale --------------------------------------------------------------

    #[test]
    fn test_reading_one_minute_past_threshold_is_stale() {
        let reading = reading_at("2024-05-01T12:44:00+00:00");
        let stale = is_stale_at(&reading, 15, fixed_now()).expect("valid datetime");
        assert!(stale);
    }

    #[test]
    fn test_same_reading_stale_under_tight_threshold_not_under_loose() {
        let reading = reading_at("2024-05-01T12:30:00Z");
        assert_eq!(is_stale_at(&reading, 20, fixed_now()), Ok(true));
        assert_eq!(is_stale_at(&reading, 60, fixed_now()), Ok(false));
    }

    // --- Error handling -----------------------------------------------------

    #[test]
    fn test_invalid_datetime_returns_error() {
        let result = is_stale_at(&reading_at("not-a-datetime"), 15, fixed_now());
        assert!(matches!(result, Err(DrFishError::ParseError(_))), "got {:?}", result);
    }

    #[test]
    fn test_empty_datetime_returns_error() {
        assert!(is_stale_at(&reading_at(""), 15, fixed_now()).is_err());
    }
}
