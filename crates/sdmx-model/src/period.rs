//! SDMX time-period normalization.
//!
//! SDMX publishes observation times in several encodings depending on the
//! series frequency. This module maps all of them onto a single calendar date:
//!
//! | Encoding      | Example      | Normalized to                  |
//! |---------------|--------------|--------------------------------|
//! | Annual        | `2020`       | `2020-12-31`                   |
//! | Semester      | `2020-S1`    | `2020-06-30`                   |
//! | Quarter       | `2020-Q3`    | `2020-09-30`                   |
//! | Month         | `2020-02`    | `2020-02-29` (last day)        |
//! | ISO week      | `2021-W01`   | `2021-01-04` (Monday)          |
//! | Full date     | `2020-03-15` | `2020-03-15` (unchanged)       |
//!
//! The functions here do no I/O and allocate only on error, so they can be
//! called once per observation.

use chrono::{NaiveDate, Weekday};

use crate::error::{PeriodError, PeriodResult};

/// Period encoding, classified by dash count and suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKind {
    /// Bare year (`2020`).
    Annual,
    /// Semester or quarter suffix (`2020-S1`, `2020-Q4`).
    SemesterOrQuarter,
    /// ISO week (`2020-W12`).
    Week,
    /// Month number (`2020-03`, `2020-M03`).
    Month,
    /// Complete date, possibly with a time part (`2020-03-31`).
    FullDate,
}

/// End of each semester and quarter as (suffix, month, day).
const SUB_ANNUAL_ENDS: [(&str, u32, u32); 6] = [
    ("S1", 6, 30),
    ("S2", 12, 31),
    ("Q1", 3, 31),
    ("Q2", 6, 30),
    ("Q3", 9, 30),
    ("Q4", 12, 31),
];

/// Classifies an SDMX period string without resolving it to a date.
pub fn classify(period: &str) -> PeriodResult<PeriodKind> {
    let trimmed = period.trim();
    let mut parts = trimmed.splitn(3, '-');
    parse_year(period, parts.next().unwrap_or_default())?;
    match (parts.next(), parts.next()) {
        (None, _) => Ok(PeriodKind::Annual),
        (Some(tail), None) => classify_tail(period, tail),
        (Some(_), Some(_)) => parse_full_date(period, trimmed).map(|_| PeriodKind::FullDate),
    }
}

/// Normalizes an SDMX period string to a calendar date.
///
/// Sub-annual periods resolve to the last day they cover; ISO weeks resolve to
/// their Monday; full dates pass through unchanged.
///
/// # Errors
///
/// Returns a [`PeriodError`] for any string that is not one of the supported
/// encodings. Nothing is defaulted.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sdmx_model::period::normalize;
///
/// assert_eq!(normalize("2020-Q1").unwrap(), NaiveDate::from_ymd_opt(2020, 3, 31).unwrap());
/// assert_eq!(normalize("2019-02").unwrap(), NaiveDate::from_ymd_opt(2019, 2, 28).unwrap());
/// assert!(normalize("2020-X9").is_err());
/// ```
pub fn normalize(period: &str) -> PeriodResult<NaiveDate> {
    let trimmed = period.trim();
    let mut parts = trimmed.splitn(3, '-');
    let year_part = parts.next().unwrap_or_default();
    match (parts.next(), parts.next()) {
        (None, _) => {
            let year = parse_year(period, year_part)?;
            last_day_of_month(year, 12).ok_or_else(|| invalid_date(period))
        }
        (Some(tail), None) => {
            let year = parse_year(period, year_part)?;
            normalize_tail(period, year, tail)
        }
        (Some(_), Some(_)) => parse_full_date(period, trimmed),
    }
}

fn classify_tail(period: &str, tail: &str) -> PeriodResult<PeriodKind> {
    if SUB_ANNUAL_ENDS.iter().any(|(suffix, _, _)| *suffix == tail) {
        Ok(PeriodKind::SemesterOrQuarter)
    } else if tail.contains('W') {
        parse_week_number(period, tail)?;
        Ok(PeriodKind::Week)
    } else {
        parse_month(period, tail)?;
        Ok(PeriodKind::Month)
    }
}

fn normalize_tail(period: &str, year: i32, tail: &str) -> PeriodResult<NaiveDate> {
    if let Some(&(_, month, day)) = SUB_ANNUAL_ENDS.iter().find(|(suffix, _, _)| *suffix == tail) {
        return NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid_date(period));
    }
    if tail.contains('W') {
        let week = parse_week_number(period, tail)?;
        return NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).ok_or_else(|| {
            PeriodError::InvalidWeek {
                period: period.to_string(),
                year,
                week,
            }
        });
    }
    let month = parse_month(period, tail)?;
    last_day_of_month(year, month).ok_or_else(|| invalid_date(period))
}

fn parse_year(period: &str, value: &str) -> PeriodResult<i32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PeriodError::InvalidYear {
            period: period.to_string(),
        });
    }
    value.parse().map_err(|_| PeriodError::InvalidYear {
        period: period.to_string(),
    })
}

/// Week number from a `W12` style tail: `W` then one or two digits.
fn parse_week_number(period: &str, tail: &str) -> PeriodResult<u32> {
    let digits = tail
        .strip_prefix('W')
        .filter(|rest| (1..=2).contains(&rest.len()) && rest.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| unknown_suffix(period, tail))?;
    digits.parse().map_err(|_| unknown_suffix(period, tail))
}

/// Month number from a `03` or `M03` style tail.
fn parse_month(period: &str, tail: &str) -> PeriodResult<u32> {
    let digits = tail.strip_prefix('M').unwrap_or(tail);
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(unknown_suffix(period, tail));
    }
    match digits.parse::<u32>() {
        Ok(month @ 1..=12) => Ok(month),
        _ => Err(unknown_suffix(period, tail)),
    }
}

fn parse_full_date(period: &str, trimmed: &str) -> PeriodResult<NaiveDate> {
    let (date, remainder) =
        NaiveDate::parse_and_remainder(trimmed, "%Y-%m-%d").map_err(|_| invalid_date(period))?;
    // Only a time part may follow the date; it is dropped.
    match remainder.chars().next() {
        None | Some('T' | ' ') => Ok(date),
        Some(_) => Err(invalid_date(period)),
    }
}

/// Last calendar day of the given month.
fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

fn unknown_suffix(period: &str, tail: &str) -> PeriodError {
    PeriodError::UnknownSuffix {
        period: period.to_string(),
        suffix: tail.to_string(),
    }
}

fn invalid_date(period: &str) -> PeriodError {
    PeriodError::InvalidDate {
        period: period.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_annual() {
        assert_eq!(normalize("2020").unwrap(), ymd(2020, 12, 31));
        assert_eq!(classify("2020").unwrap(), PeriodKind::Annual);
    }

    #[test]
    fn test_semesters_and_quarters() {
        assert_eq!(normalize("2020-S1").unwrap(), ymd(2020, 6, 30));
        assert_eq!(normalize("2020-S2").unwrap(), ymd(2020, 12, 31));
        assert_eq!(normalize("2020-Q1").unwrap(), ymd(2020, 3, 31));
        assert_eq!(normalize("2020-Q2").unwrap(), ymd(2020, 6, 30));
        assert_eq!(normalize("2020-Q3").unwrap(), ymd(2020, 9, 30));
        assert_eq!(normalize("2020-Q4").unwrap(), ymd(2020, 12, 31));
        assert_eq!(classify("2020-Q2").unwrap(), PeriodKind::SemesterOrQuarter);
    }

    #[test]
    fn test_month_respects_leap_years() {
        assert_eq!(normalize("2020-02").unwrap(), ymd(2020, 2, 29));
        assert_eq!(normalize("2019-02").unwrap(), ymd(2019, 2, 28));
        assert_eq!(normalize("2000-02").unwrap(), ymd(2000, 2, 29));
        assert_eq!(normalize("1900-02").unwrap(), ymd(1900, 2, 28));
        assert_eq!(normalize("2020-12").unwrap(), ymd(2020, 12, 31));
        assert_eq!(normalize("2020-M04").unwrap(), ymd(2020, 4, 30));
        assert_eq!(classify("2020-07").unwrap(), PeriodKind::Month);
    }

    #[test]
    fn test_iso_week_resolves_to_monday() {
        let date = normalize("2021-W01").unwrap();
        assert_eq!(date, ymd(2021, 1, 4));
        assert_eq!(date.weekday(), Weekday::Mon);
        assert_eq!(date.iso_week().week(), 1);

        // ISO week 1 of 2020 starts in the previous calendar year.
        assert_eq!(normalize("2020-W01").unwrap(), ymd(2019, 12, 30));
        assert_eq!(classify("2020-W12").unwrap(), PeriodKind::Week);
    }

    #[test]
    fn test_full_date_passes_through() {
        assert_eq!(normalize("2020-03-15").unwrap(), ymd(2020, 3, 15));
        assert_eq!(normalize("2020-03-15T10:30:00").unwrap(), ymd(2020, 3, 15));
        assert_eq!(normalize(" 2020-03-15 ").unwrap(), ymd(2020, 3, 15));
        assert_eq!(classify("2020-03-15").unwrap(), PeriodKind::FullDate);
    }

    #[test]
    fn test_unknown_suffix_is_an_error() {
        assert!(matches!(
            normalize("2020-X9"),
            Err(PeriodError::UnknownSuffix { .. })
        ));
        assert!(matches!(
            normalize("2020-13"),
            Err(PeriodError::UnknownSuffix { .. })
        ));
        assert!(matches!(
            normalize("2020-Q5"),
            Err(PeriodError::UnknownSuffix { .. })
        ));
        assert!(matches!(
            normalize("2020-W"),
            Err(PeriodError::UnknownSuffix { .. })
        ));
    }

    #[test]
    fn test_week_out_of_range() {
        // 2021 has 52 ISO weeks.
        assert!(matches!(
            normalize("2021-W53"),
            Err(PeriodError::InvalidWeek { week: 53, .. })
        ));
        assert!(normalize("2020-W53").is_ok());
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(normalize(""), Err(PeriodError::InvalidYear { .. })));
        assert!(matches!(normalize("20x0"), Err(PeriodError::InvalidYear { .. })));
        assert!(matches!(
            normalize("2020-02-30"),
            Err(PeriodError::InvalidDate { .. })
        ));
        assert!(classify("abc-Q1").is_err());
    }

    #[test]
    fn test_week_tail_must_be_w_and_two_digits() {
        for period in ["2020-XW12", "2020-W012", "2020-W1x", "2020-12W"] {
            assert!(
                matches!(normalize(period), Err(PeriodError::UnknownSuffix { .. })),
                "{period} should be rejected"
            );
            assert!(classify(period).is_err(), "{period} should not classify");
        }
        assert_eq!(normalize("2020-W5").unwrap(), ymd(2020, 1, 27));
    }

    #[test]
    fn test_full_date_rejects_trailing_garbage() {
        assert!(matches!(
            normalize("2020-03-15abc"),
            Err(PeriodError::InvalidDate { .. })
        ));
        assert!(matches!(
            normalize("2020-03-15+01:00"),
            Err(PeriodError::InvalidDate { .. })
        ));
        assert_eq!(normalize("2020-03-15 10:30").unwrap(), ymd(2020, 3, 15));
    }

    #[test]
    fn test_classify_agrees_with_normalize_on_full_dates() {
        for period in ["2020-02-30", "2020-03-15abc", "2020-13-01"] {
            assert!(normalize(period).is_err());
            assert!(
                matches!(classify(period), Err(PeriodError::InvalidDate { .. })),
                "{period} should not classify"
            );
        }
        assert_eq!(classify("2020-02-29T00:00").unwrap(), PeriodKind::FullDate);
    }
}
