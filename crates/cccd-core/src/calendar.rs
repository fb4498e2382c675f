//! Gregorian calendar helpers shared by the generator and the analyzer.

use chrono::{Datelike, NaiveDate};

use crate::era::{MAX_BIRTH_YEAR, MIN_BIRTH_YEAR};

/// Gregorian leap year: divisible by 4, except centuries not divisible by 400.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`, or `None` if `month` is not 1-12.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 if is_leap_year(year) => Some(29),
        2 => Some(28),
        _ => None,
    }
}

/// A birth date within the supported year range, or `None`.
pub fn birth_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(MIN_BIRTH_YEAR..=MAX_BIRTH_YEAR).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whole years elapsed between `birth` and `on`, counting a year only once
/// the birthday has been reached. Dates of birth after `on` give zero.
pub fn age_on(birth: NaiveDate, on: NaiveDate) -> u32 {
    let mut age = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

/// `DD/MM/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_year_rules() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2400));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2100));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn february_lengths() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(2300, 2), Some(28));
    }

    #[test]
    fn month_bounds() {
        assert_eq!(days_in_month(2000, 0), None);
        assert_eq!(days_in_month(2000, 13), None);
        assert_eq!(days_in_month(2000, 4), Some(30));
        assert_eq!(days_in_month(2000, 12), Some(31));
    }

    #[test]
    fn days_in_month_agrees_with_chrono() {
        for year in [1900, 1996, 2000, 2023, 2024, 2100, 2200, 2399] {
            for month in 1..=12 {
                let last = days_in_month(year, month).unwrap();
                assert!(NaiveDate::from_ymd_opt(year, month, last).is_some());
                assert!(NaiveDate::from_ymd_opt(year, month, last + 1).is_none());
            }
        }
    }

    #[test]
    fn birth_date_range() {
        assert!(birth_date(1900, 1, 1).is_some());
        assert!(birth_date(2399, 12, 31).is_some());
        assert!(birth_date(1899, 12, 31).is_none());
        assert!(birth_date(2400, 1, 1).is_none());
        assert!(birth_date(1900, 2, 29).is_none());
        assert!(birth_date(2000, 2, 29).is_some());
        assert!(birth_date(2000, 0, 1).is_none());
        assert!(birth_date(2000, 1, 0).is_none());
    }

    #[test]
    fn age_decrements_before_birthday() {
        let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
        let before = NaiveDate::from_ymd_opt(2026, 6, 14).unwrap();
        let on = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        assert_eq!(age_on(birth, before), 25);
        assert_eq!(age_on(birth, on), 26);
    }

    #[test]
    fn future_birth_clamps_to_zero() {
        let birth = NaiveDate::from_ymd_opt(2150, 1, 1).unwrap();
        let on = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(age_on(birth, on), 0);
    }

    #[test]
    fn format_is_day_first() {
        let d = NaiveDate::from_ymd_opt(2000, 1, 15).unwrap();
        assert_eq!(format_date(d), "15/01/2000");
    }
}
