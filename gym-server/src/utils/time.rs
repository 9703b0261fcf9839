//! Time helpers - business timezone conversion
//!
//! All date-to-timestamp conversion happens in the API handler layer;
//! repositories only receive `i64` Unix millis. The business timezone is
//! configuration (America/Mexico_City by default), never the host clock's
//! local zone.

use chrono::NaiveDate;
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Reject dates in the future (business timezone)
pub fn validate_not_future(date: NaiveDate, tz: Tz) -> AppResult<()> {
    let today = today_in(tz);
    if date > today {
        return Err(AppError::validation(format!(
            "Date {} is in the future (today is {})",
            date, today
        )));
    }
    Ok(())
}

/// Current calendar day in the business timezone
pub fn today_in(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// Date + hour/minute/second -> Unix millis (business timezone)
///
/// DST gap fallback: if the local time does not exist, fall back to UTC.
pub fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(hour, min, sec).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Start of day (00:00:00) -> Unix millis (business timezone)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// End of day -> next day's 00:00:00 Unix millis (business timezone)
///
/// Callers use `< end` (exclusive) semantics.
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hms_to_millis(next_day, 0, 0, 0, tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Mexico_City;

    #[test]
    fn parse_date_accepts_iso_days() {
        assert!(parse_date("2026-08-05").is_ok());
        assert!(parse_date("05/08/2026").is_err());
        assert!(parse_date("2026-13-40").is_err());
    }

    #[test]
    fn day_bounds_cover_exactly_one_day() {
        let date = parse_date("2026-08-05").unwrap();
        let start = day_start_millis(date, Mexico_City);
        let end = day_end_millis(date, Mexico_City);
        assert_eq!(end - start, 24 * 60 * 60 * 1000);
    }

    #[test]
    fn day_start_respects_utc_offset() {
        // Mexico City is UTC-6 (no DST since 2022)
        let date = parse_date("2026-08-05").unwrap();
        let start = day_start_millis(date, Mexico_City);
        let utc_midnight = date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis();
        assert_eq!(start - utc_midnight, 6 * 60 * 60 * 1000);
    }
}
