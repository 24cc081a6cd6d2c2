//! Position duration math.

use chrono::NaiveDate;
use thiserror::Error;

/// Months assumed for a position with no end date.
pub const CURRENT_POSITION_MONTHS: u64 = 12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("unrecognized date {0:?} (expected YYYY or YYYY-MM-DD)")]
    Unrecognized(String),
}

/// Parses the two date formats the extractor emits. A bare year means
/// January 1st of that year.
fn parse_cv_date(raw: &str) -> Result<NaiveDate, DateError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(year) = raw.parse::<i32>() {
        if let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) {
            return Ok(date);
        }
    }
    Err(DateError::Unrecognized(raw.to_string()))
}

/// Duration of a position in whole months.
///
/// With both dates present: `round(days / 30)`, floored at 1. With no end
/// date (current position): `CURRENT_POSITION_MONTHS`.
pub fn duration_months(start_date: &str, end_date: Option<&str>) -> Result<u64, DateError> {
    let Some(end_date) = end_date else {
        return Ok(CURRENT_POSITION_MONTHS);
    };

    let start = parse_cv_date(start_date)?;
    let end = parse_cv_date(end_date)?;

    let days = (end - start).num_days();
    let months = (days as f64 / 30.0).round() as i64;
    Ok(months.max(1) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_end_date_defaults_to_twelve_months() {
        assert_eq!(duration_months("2020-03-01", None).unwrap(), 12);
    }

    #[test]
    fn test_full_dates_round_days_over_thirty() {
        // 2020-01-01 → 2021-01-01 is 366 days (leap year): round(12.2) = 12
        assert_eq!(
            duration_months("2020-01-01", Some("2021-01-01")).unwrap(),
            12
        );
        // 45 days: round(1.5) = 2
        assert_eq!(
            duration_months("2020-01-01", Some("2020-02-15")).unwrap(),
            2
        );
    }

    #[test]
    fn test_duration_never_below_one_month() {
        // Same day: round(0) = 0 → floored to 1
        assert_eq!(
            duration_months("2020-01-01", Some("2020-01-01")).unwrap(),
            1
        );
        // Ten days: round(0.33) = 0 → floored to 1
        assert_eq!(
            duration_months("2020-01-01", Some("2020-01-11")).unwrap(),
            1
        );
        // End before start is clamped too, not an error
        assert_eq!(
            duration_months("2021-01-01", Some("2020-01-01")).unwrap(),
            1
        );
    }

    #[test]
    fn test_year_only_dates_parse_as_january_first() {
        // 2020 → 2022 is 731 days: round(24.4) = 24
        assert_eq!(duration_months("2020", Some("2022")).unwrap(), 24);
    }

    #[test]
    fn test_mixed_formats() {
        // 2020-01-01 → 2020-07-01 is 182 days: round(6.07) = 6
        assert_eq!(duration_months("2020", Some("2020-07-01")).unwrap(), 6);
    }

    #[test]
    fn test_unrecognized_date_is_an_error() {
        assert!(duration_months("March 2020", Some("2021")).is_err());
        assert!(duration_months("2020", Some("yesterday")).is_err());
        assert!(duration_months("", Some("2021")).is_err());
    }

    #[test]
    fn test_unrecognized_end_date_ignored_when_absent() {
        // The current-position default never touches the start date.
        assert_eq!(duration_months("garbage", None).unwrap(), 12);
    }
}
