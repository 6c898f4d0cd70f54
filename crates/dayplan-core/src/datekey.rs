//! Canonical date-key codec.
//!
//! Every date the planner touches is addressed by a locale-stable
//! `YYYY-MM-DD` key formatted from the civil (local-calendar) date fields.
//! Keys never go through a UTC conversion, so a key produced late in the
//! evening names the same day the user sees on their wall calendar.

use jiff::civil::Date;
use jiff::{Span, Zoned};

/// Formats a civil date as its canonical `YYYY-MM-DD` key.
pub fn to_date_key(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parses a strict `YYYY-MM-DD` key into a civil date.
///
/// Returns `None` for malformed shapes and for component triples that do not
/// name a real calendar date (`2025-02-31` is rejected, not normalized).
pub fn parse_date_key(key: &str) -> Option<Date> {
    let mut parts = key.split('-');
    let (y, m, d) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    if y.len() != 4 || m.len() != 2 || d.len() != 2 {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        return None;
    }
    let year: i16 = y.parse().ok()?;
    let month: i8 = m.parse().ok()?;
    let day: i8 = d.parse().ok()?;
    Date::new(year, month, day).ok()
}

/// Parses a date key, falling back to today for anything invalid.
pub fn parse_date_key_or_today(key: &str) -> Date {
    match parse_date_key(key) {
        Some(date) => date,
        None => {
            log::warn!("invalid date key '{key}', falling back to today");
            today()
        }
    }
}

/// Today's civil date in the system timezone.
pub fn today() -> Date {
    Zoned::now().date()
}

/// Calendar day arithmetic with month/year rollover.
pub fn add_days(date: Date, days: i64) -> Date {
    date.checked_add(Span::new().days(days)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_valid_keys() {
        for key in [
            "2025-01-01",
            "2025-12-31",
            "2024-02-29", // leap day
            "2000-02-29",
            "1999-06-15",
            "2025-02-28",
        ] {
            let date = parse_date_key(key).expect("key should parse");
            assert_eq!(to_date_key(date), key);
        }
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(parse_date_key("2025-02-31").is_none());
        assert!(parse_date_key("2025-02-29").is_none()); // not a leap year
        assert!(parse_date_key("2025-13-01").is_none());
        assert!(parse_date_key("2025-00-10").is_none());
        assert!(parse_date_key("2025-04-31").is_none());
    }

    #[test]
    fn test_rejects_malformed_shapes() {
        assert!(parse_date_key("").is_none());
        assert!(parse_date_key("2025-1-01").is_none());
        assert!(parse_date_key("2025-01-1").is_none());
        assert!(parse_date_key("25-01-01").is_none());
        assert!(parse_date_key("2025/01/01").is_none());
        assert!(parse_date_key("2025-01-01-09").is_none());
        assert!(parse_date_key("not a date").is_none());
        assert!(parse_date_key("2025-01-0x").is_none());
    }

    #[test]
    fn test_invalid_key_falls_back_to_today() {
        assert_eq!(parse_date_key_or_today("garbage"), today());
        assert_eq!(parse_date_key_or_today("2025-02-31"), today());
    }

    #[test]
    fn test_add_days_rollover() {
        let date = parse_date_key("2024-12-31").unwrap();
        assert_eq!(to_date_key(add_days(date, 1)), "2025-01-01");

        let date = parse_date_key("2024-02-28").unwrap();
        assert_eq!(to_date_key(add_days(date, 1)), "2024-02-29");
        assert_eq!(to_date_key(add_days(date, 2)), "2024-03-01");

        let date = parse_date_key("2025-01-01").unwrap();
        assert_eq!(to_date_key(add_days(date, -1)), "2024-12-31");
    }
}
