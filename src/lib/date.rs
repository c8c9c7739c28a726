//! Month labels and the partition of a month into week columns
//!
//! A month is displayed as a number of Monday-to-Sunday weeks. A week
//! belongs to the month that holds the majority (at least 4) of its days,
//! which is the same rule ISO 8601 uses to assign weeks to years.
//!
//! The grid additionally bounds every month to `MIN_WEEKS..=MAX_WEEKS`
//! columns. This is a display constraint and not a calendar fact: the
//! majority rule alone always yields 4 or 5.

use chrono::{Datelike, NaiveDate};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::fmt;
use std::str::FromStr;

/// Fewest week columns a month is drawn with
pub const MIN_WEEKS: u8 = 4;
/// Most week columns a month is drawn with
pub const MAX_WEEKS: u8 = 6;
/// Days of a week that must fall inside a month for the week to count
const MAJORITY: i32 = 4;

/// Twelve months in the year, identified by their 3-letter abbreviations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, PartialOrd, Ord)]
pub enum Month {
    Jan = 0,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = {
        use Month::*;
        [Jan, Feb, Mar, Apr, May, Jun, Jul, Aug, Sep, Oct, Nov, Dec]
    };

    /// Calendar number of the month, `1..=12`
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Inverse of `number`
    pub fn from_number(n: u32) -> Option<Self> {
        n.checked_sub(1).and_then(Self::from_u32)
    }

    /// Month `count` places after the current one with wrapping
    pub fn shift(self, count: usize) -> Self {
        Self::ALL[(self as usize + count) % 12]
    }

    /// Number of days in this month of the given year
    pub fn count(self, year: i32) -> u8 {
        use Month::*;
        match self {
            Jan | Mar | May | Jul | Aug | Oct | Dec => 31,
            Apr | Jun | Sep | Nov => 30,
            Feb => if is_leap(year) { 29 } else { 28 },
        }
    }

    /// Date of the 1st, if the year is representable
    pub fn first_day(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.number(), 1)
    }

    /// Upper-case label used in headers (`"JUL"`)
    pub fn label(self) -> &'static str {
        use Month::*;
        match self {
            Jan => "JAN",
            Feb => "FEB",
            Mar => "MAR",
            Apr => "APR",
            May => "MAY",
            Jun => "JUN",
            Jul => "JUL",
            Aug => "AUG",
            Sep => "SEP",
            Oct => "OCT",
            Nov => "NOV",
            Dec => "DEC",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Text that does not name a month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMonth(pub String);

impl fmt::Display for UnknownMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid month", self.0)
    }
}

impl FromStr for Month {
    type Err = UnknownMonth;

    /// Labels are case-insensitive (`"Jul"`, `"jul"`), numbers go from `1` to `12`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let by_label = Self::ALL
            .iter()
            .copied()
            .find(|m| m.label().eq_ignore_ascii_case(s));
        by_label
            .or_else(|| s.parse::<u32>().ok().and_then(Self::from_number))
            .ok_or_else(|| UnknownMonth(s.to_string()))
    }
}

fn is_leap(year: i32) -> bool {
    if year % 400 == 0 {
        true
    } else if year % 100 == 0 {
        false
    } else {
        year % 4 == 0
    }
}

/// Day ranges (both ends inclusive, 1-based) of the weeks that count for `month`
///
/// Weeks run Monday to Sunday; only the days inside the month are reported,
/// and only weeks with at least 4 of their days inside the month are kept.
/// An unrepresentable year yields no weeks.
pub fn week_spans(year: i32, month: Month) -> Vec<(u8, u8)> {
    let first = match month.first_day(year) {
        Some(d) => d,
        None => return Vec::new(),
    };
    let len = month.count(year) as i32;
    let mut spans = Vec::new();
    // day number of the Monday opening the week that contains the 1st
    let mut monday = 1 - first.weekday().num_days_from_monday() as i32;
    while monday <= len {
        let lo = monday.max(1);
        let hi = (monday + 6).min(len);
        if hi - lo + 1 >= MAJORITY {
            spans.push((lo as u8, hi as u8));
        }
        monday += 7;
    }
    spans
}

/// Number of week columns for `month` of `year`, always in `MIN_WEEKS..=MAX_WEEKS`
pub fn weeks_in_month(year: i32, month: Month) -> u8 {
    let counted = week_spans(year, month).len().min(u8::MAX as usize) as u8;
    counted.clamp(MIN_WEEKS, MAX_WEEKS)
}
