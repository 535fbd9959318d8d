use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Invalid date: {0}")]
    Invalid(String),
}

// ── Accepted patterns ────────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_day_first_slash, r"^(\d{1,2})/(\d{1,2})/(\d{4})$");
re!(re_year_first_dash, r"^(\d{4})-(\d{1,2})-(\d{1,2})$");
re!(re_day_first_dash, r"^(\d{1,2})-(\d{1,2})-(\d{4})$");

#[derive(Clone, Copy)]
enum FieldOrder {
    DayMonthYear,
    YearMonthDay,
}

/// Tried in order; the first pattern that matches decides the field layout.
fn patterns() -> [(&'static Regex, FieldOrder); 3] {
    [
        (re_day_first_slash(), FieldOrder::DayMonthYear),
        (re_year_first_dash(), FieldOrder::YearMonthDay),
        (re_day_first_dash(), FieldOrder::DayMonthYear),
    ]
}

/// Parse `DD/MM/YYYY`, `YYYY-MM-DD` or `DD-MM-YYYY` into a calendar date.
///
/// Returns `None` for anything else, including dates that do not exist on the
/// calendar (`30/02/2024`, `29/02/2023`). Surrounding whitespace is ignored.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    patterns().into_iter().find_map(|(re, order)| {
        let caps = re.captures(s)?;
        let (y, m, d) = match order {
            FieldOrder::DayMonthYear => (&caps[3], &caps[2], &caps[1]),
            FieldOrder::YearMonthDay => (&caps[1], &caps[2], &caps[3]),
        };
        // from_ymd_opt refuses out-of-range fields instead of rolling over.
        NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
    })
}

/// Like [`parse_date`], for input the caller already vouched for.
pub fn parse_date_strict(input: &str) -> Result<NaiveDate, DateError> {
    parse_date(input).ok_or_else(|| DateError::Invalid(input.to_string()))
}

/// Render a date the way UK users type it: `DD/MM/YYYY`.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Days from departure to return. Zero for a same-day round trip.
pub fn calendar_days_between(out_date: NaiveDate, in_date: NaiveDate) -> i64 {
    (in_date - out_date).num_days()
}

/// Whole days spent abroad, excluding the departure and return days.
pub fn full_days_from(calendar_days: i64) -> i64 {
    (calendar_days - 1).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── parse_date ────────────────────────────────────────────────────────────

    #[test]
    fn parses_day_first_slash() {
        assert_eq!(parse_date("15/01/2024"), Some(date(2024, 1, 15)));
    }

    #[test]
    fn parses_iso() {
        assert_eq!(parse_date("2024-01-15"), Some(date(2024, 1, 15)));
    }

    #[test]
    fn parses_day_first_dash() {
        assert_eq!(parse_date("15-01-2024"), Some(date(2024, 1, 15)));
    }

    #[test]
    fn accepts_single_digit_day_and_month() {
        assert_eq!(parse_date("5/1/2024"), Some(date(2024, 1, 5)));
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(parse_date("  15/01/2024\t"), Some(date(2024, 1, 15)));
    }

    #[test]
    fn rejects_year_first_slash() {
        assert_eq!(parse_date("2024/01/15"), None);
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("invalid"), None);
        assert_eq!(parse_date("15/01/24"), None);
        assert_eq!(parse_date("15/01/2024 extra"), None);
    }

    #[test]
    fn leap_year_boundary() {
        assert_eq!(parse_date("29/02/2024"), Some(date(2024, 2, 29)));
        assert_eq!(parse_date("29/02/2023"), None);
        assert_eq!(parse_date("2023-02-29"), None);
    }

    #[test]
    fn rejects_overflowing_fields() {
        assert_eq!(parse_date("30/02/2024"), None);
        assert_eq!(parse_date("31/04/2024"), None);
        assert_eq!(parse_date("01/13/2024"), None);
        assert_eq!(parse_date("00/01/2024"), None);
    }

    #[test]
    fn iso_output_is_stable() {
        let first = parse_date("15/01/2024").unwrap().to_string();
        let second = parse_date("15/01/2024").unwrap().to_string();
        assert_eq!(first, "2024-01-15");
        assert_eq!(first, second);
    }

    #[test]
    fn display_round_trip() {
        for s in ["15/01/2024", "29/02/2024", "31/12/1999", "01/01/2000"] {
            assert_eq!(format_display_date(parse_date(s).unwrap()), s);
        }
    }

    // ── parse_date_strict ─────────────────────────────────────────────────────

    #[test]
    fn strict_carries_raw_input() {
        assert_eq!(
            parse_date_strict(" 31/02/2024 "),
            Err(DateError::Invalid(" 31/02/2024 ".to_string()))
        );
        assert_eq!(parse_date_strict("2024-03-01"), Ok(date(2024, 3, 1)));
    }

    // ── day arithmetic ────────────────────────────────────────────────────────

    #[test]
    fn day_counts() {
        let days = calendar_days_between(date(2024, 1, 15), date(2024, 1, 20));
        assert_eq!(days, 5);
        assert_eq!(full_days_from(days), 4);
    }

    #[test]
    fn same_day_is_zero_not_negative() {
        let days = calendar_days_between(date(2024, 1, 15), date(2024, 1, 15));
        assert_eq!(days, 0);
        assert_eq!(full_days_from(days), 0);
    }

    #[test]
    fn year_crossing() {
        let days = calendar_days_between(date(2023, 12, 20), date(2024, 1, 5));
        assert_eq!(days, 16);
        assert_eq!(full_days_from(days), 15);
    }
}
