// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Stored wall-clock format for `local_datetime`. Sorts lexicographically,
/// so date cutoffs compare with a plain `>=` in SQL.
const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Strava's `start_date_local` format: ISO-8601 with a literal `Z` suffix.
const STRAVA_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Convert an epoch timestamp from the tracker to the device's wall-clock
/// time. Returns `None` for timestamps outside chrono's representable range.
pub fn local_datetime_string(epoch_secs: i64, offset: FixedOffset) -> Option<String> {
    let utc = DateTime::from_timestamp(epoch_secs, 0)?;
    Some(utc.with_timezone(&offset).format(LOCAL_FORMAT).to_string())
}

/// Re-format a stored `local_datetime` into the timestamp Strava expects.
pub fn strava_start_date(local_datetime: &str) -> Option<String> {
    let dt = NaiveDateTime::parse_from_str(local_datetime, LOCAL_FORMAT).ok()?;
    Some(dt.format(STRAVA_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc_minus_3() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    #[test]
    fn epoch_shifts_into_device_zone() {
        // 2024-06-15 12:00:00 UTC -> 09:00:00 at UTC-3
        let s = local_datetime_string(1718452800, utc_minus_3()).unwrap();
        assert_eq!(s, "2024-06-15 09:00:00");
    }

    #[test]
    fn strava_format_has_literal_z() {
        let s = strava_start_date("2024-06-15 09:00:00").unwrap();
        assert_eq!(s, "2024-06-15T09:00:00Z");
    }

    #[test]
    fn malformed_local_datetime_is_none() {
        assert!(strava_start_date("June 15th").is_none());
    }
}
