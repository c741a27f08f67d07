use chrono::{DateTime, NaiveDate, Utc};

use crate::core::error::{AppError, Result};

/// Accepts an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC),
/// which is what HTML date inputs submit.
pub fn parse_date_time(value: &str, field: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::Validation(format!("{} must be a valid date", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_plain_date() {
        let dt = parse_date_time("2024-01-26", "Award date").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 1, 26));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_rfc3339_with_offset() {
        let dt = parse_date_time("2024-08-15T10:30:00+05:30", "Date").unwrap();
        assert_eq!(dt.hour(), 5);
        assert_eq!(dt.minute(), 0);
    }

    #[test]
    fn test_invalid_date() {
        let err = parse_date_time("15/08/2024", "Date of birth").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Date of birth must be a valid date"));
    }
}
