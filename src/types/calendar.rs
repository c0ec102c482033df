use chrono::{Datelike, Duration, NaiveDateTime};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Day counts of a non-leap year, January first.
pub const STANDARD_MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Hours in a standard (non-leap) year.
pub const HOURS_PER_STANDARD_YEAR: usize = 8760;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);
impl Year {
    pub fn get(self) -> i32 {
        self.0
    }

    pub fn is_leap(self) -> bool {
        let y = self.0;
        (y % 4 == 0 && y % 100 != 0) || y % 400 == 0
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A calendar month of a specific year; ordering is chronological.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);
impl Month {
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }
    pub fn new(month: u32, year: i32) -> Self {
        Self(year, month)
    }
    pub fn of(timestamp: NaiveDateTime) -> Self {
        Self(timestamp.year(), timestamp.month())
    }

    /// Hours in this month once 29 February is discarded, zero for a month
    /// number outside 1-12.
    pub fn standard_hours(self) -> usize {
        standard_month_days(self.1).map_or(0, |days| days as usize * 24)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

/// Day count of `month` (1-12) in a non-leap year.
pub fn standard_month_days(month: u32) -> Option<u32> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    STANDARD_MONTH_DAYS.get(index).copied()
}

/// Whether the timestamp falls on 29 February.
pub fn is_leap_day(timestamp: NaiveDateTime) -> bool {
    timestamp.month() == 2 && timestamp.day() == 29
}

/// Start of the hour a record covers. Labels are hour-ending: the value at
/// `t` covers `(t - 1h, t]`, so `2011-02-01 00:00` belongs to 31 January.
pub fn covered_hour(label: NaiveDateTime) -> NaiveDateTime {
    label - Duration::hours(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_standard_year_has_8760_hours() {
        let hours: u32 = STANDARD_MONTH_DAYS.iter().map(|d| d * 24).sum();
        assert_eq!(hours as usize, HOURS_PER_STANDARD_YEAR);
    }

    #[test]
    fn test_leap_years() {
        assert!(Year(2012).is_leap());
        assert!(Year(2000).is_leap());
        assert!(!Year(1900).is_leap());
        assert!(!Year(1970).is_leap());
    }

    #[test]
    fn test_month_ordering_and_display() {
        assert!(Month(2011, 12) < Month(2012, 1));
        assert_eq!(Month::new(3, 2015).to_string(), "2015-03");
        assert_eq!(Month(2012, 2).standard_hours(), 28 * 24);
        let leap_day = NaiveDate::from_ymd_opt(2012, 2, 29)
            .unwrap()
            .and_hms_opt(5, 0, 0)
            .unwrap();
        assert!(is_leap_day(leap_day));
        assert_eq!(Month::of(leap_day), Month(2012, 2));
    }

    #[test]
    fn test_month_days_reject_out_of_range() {
        assert_eq!(standard_month_days(1), Some(31));
        assert_eq!(standard_month_days(2), Some(28));
        assert_eq!(standard_month_days(12), Some(31));
        assert_eq!(standard_month_days(0), None);
        assert_eq!(standard_month_days(13), None);
        assert_eq!(Month(2011, 0).standard_hours(), 0);
    }

    #[test]
    fn test_midnight_label_covers_previous_day() {
        let label = NaiveDate::from_ymd_opt(2011, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(Month::of(covered_hour(label)), Month(2011, 1));
        let leap_midnight = NaiveDate::from_ymd_opt(2012, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(is_leap_day(covered_hour(leap_midnight)));
    }
}
