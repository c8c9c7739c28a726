//! Grid geometry: the rolling 12-month window and its seasons
//!
//! The window models a growing-season year rather than a calendar year.
//! Starting from a configured month of the reference year, it runs for
//! twelve months; months earlier in the calendar than the start month
//! belong to the following year.
//!
//! Week counts are computed once when the window is built and kept in a
//! lookup table, so the geometry stays stable for the whole session.

use std::fmt;

use crate::lib::date::{weeks_in_month, Month};

/// One column group of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthInfo {
    pub month: Month,
    /// calendar year this occurrence of the month falls in
    pub year: i32,
    /// number of week columns, `4..=6`
    pub weeks: u8,
    /// position in the rolling window, `0..12`
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    Southern,
    Northern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonName {
    Summer,
    Autumn,
    Winter,
    Spring,
}

impl fmt::Display for SeasonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl SeasonName {
    /// Meteorological season of a month
    pub fn of(month: Month, hemisphere: Hemisphere) -> Self {
        use Month::*;
        use SeasonName::*;
        let southern = match month {
            Dec | Jan | Feb => Summer,
            Mar | Apr | May => Autumn,
            Jun | Jul | Aug => Winter,
            Sep | Oct | Nov => Spring,
        };
        match hemisphere {
            Hemisphere::Southern => southern,
            Hemisphere::Northern => southern.opposite(),
        }
    }

    fn opposite(self) -> Self {
        use SeasonName::*;
        match self {
            Summer => Winter,
            Autumn => Spring,
            Winter => Summer,
            Spring => Autumn,
        }
    }
}

/// Consecutive months of the window that share a season
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    pub name: SeasonName,
    pub months: Vec<Month>,
}

/// The rolling window, immutable once built
#[derive(Debug, Clone)]
pub struct Calendar {
    year: i32,
    start: Month,
    months: Vec<MonthInfo>,
    seasons: Vec<Season>,
}

impl Calendar {
    /// Build the twelve months starting at `start` of `year`
    pub fn rolling(year: i32, start: Month, hemisphere: Hemisphere) -> Self {
        let months = (0..12)
            .map(|position| {
                let month = start.shift(position);
                let year = if month >= start { year } else { year + 1 };
                MonthInfo {
                    month,
                    year,
                    weeks: weeks_in_month(year, month),
                    position,
                }
            })
            .collect::<Vec<_>>();
        let seasons = group_seasons(&months, hemisphere);
        let cal = Self { year, start, months, seasons };
        log::info!(
            "Calendar {}-{}: {} week columns in {} seasons",
            start,
            year,
            cal.total_weeks(),
            cal.seasons.len(),
        );
        cal
    }

    /// Reference year (the year of the first month)
    pub fn year(&self) -> i32 {
        self.year
    }

    /// First month of the window
    pub fn start(&self) -> Month {
        self.start
    }

    /// Months in window order
    pub fn months(&self) -> &[MonthInfo] {
        &self.months
    }

    /// Seasons in window order
    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    /// Week count of a month in this window
    pub fn weeks(&self, month: Month) -> u8 {
        self.info(month).weeks
    }

    /// Column group of `month`
    pub fn info(&self, month: Month) -> &MonthInfo {
        // every month occurs exactly once in the window
        let position = (month as usize + 12 - self.start as usize) % 12;
        &self.months[position]
    }

    /// Whether `week` is a column of `month`
    pub fn contains(&self, month: Month, week: u8) -> bool {
        (1..=self.weeks(month)).contains(&week)
    }

    /// Total number of week columns of a season
    pub fn season_weeks(&self, season: &Season) -> u32 {
        season.months.iter().map(|m| self.weeks(*m) as u32).sum()
    }

    /// Total number of week columns of the window
    pub fn total_weeks(&self) -> u32 {
        self.months.iter().map(|m| m.weeks as u32).sum()
    }
}

fn group_seasons(months: &[MonthInfo], hemisphere: Hemisphere) -> Vec<Season> {
    let mut seasons: Vec<Season> = Vec::new();
    for info in months {
        let name = SeasonName::of(info.month, hemisphere);
        match seasons.last_mut() {
            Some(season) if season.name == name => season.months.push(info.month),
            _ => seasons.push(Season { name, months: vec![info.month] }),
        }
    }
    seasons
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::date::Month::*;

    #[test]
    fn rolling_years() {
        let cal = Calendar::rolling(2025, Jul, Hemisphere::Southern);
        let m = cal.months();
        assert_eq!(m.len(), 12);
        assert_eq!((m[0].month, m[0].year), (Jul, 2025));
        assert_eq!((m[5].month, m[5].year), (Dec, 2025));
        assert_eq!((m[6].month, m[6].year), (Jan, 2026));
        assert_eq!((m[11].month, m[11].year), (Jun, 2026));
        for (i, info) in m.iter().enumerate() {
            assert_eq!(info.position, i);
            assert_eq!(cal.info(info.month), info);
        }
    }

    #[test]
    fn calendar_year_window() {
        let cal = Calendar::rolling(2024, Jan, Hemisphere::Northern);
        assert!(cal.months().iter().all(|m| m.year == 2024));
        assert_eq!(cal.months()[11].month, Dec);
    }

    #[test]
    fn lookup_matches_computation() {
        let cal = Calendar::rolling(2025, Jul, Hemisphere::Southern);
        assert_eq!(cal.weeks(Jul), 5);
        assert_eq!(cal.weeks(Aug), 4);
        assert_eq!(cal.weeks(Jan), weeks_in_month(2026, Jan));
        assert!(cal.contains(Jul, 5));
        assert!(!cal.contains(Aug, 5));
        assert!(!cal.contains(Aug, 0));
        assert_eq!(
            cal.total_weeks(),
            cal.months().iter().map(|m| m.weeks as u32).sum::<u32>()
        );
    }

    macro_rules! season {
        ( $name:ident : $( $m:ident ),* ) => {
            Season { name: SeasonName::$name, months: vec![$( $m ),*] }
        };
    }

    #[test]
    fn southern_seasons() {
        let cal = Calendar::rolling(2025, Jul, Hemisphere::Southern);
        assert_eq!(
            cal.seasons(),
            &[
                season!(Winter: Jul, Aug),
                season!(Spring: Sep, Oct, Nov),
                season!(Summer: Dec, Jan, Feb),
                season!(Autumn: Mar, Apr, May),
                season!(Winter: Jun),
            ][..]
        );
        let widths = cal.seasons().iter().map(|s| cal.season_weeks(s)).sum::<u32>();
        assert_eq!(widths, cal.total_weeks());
    }

    #[test]
    fn northern_seasons() {
        let cal = Calendar::rolling(2025, Jan, Hemisphere::Northern);
        assert_eq!(
            cal.seasons(),
            &[
                season!(Winter: Jan, Feb),
                season!(Spring: Mar, Apr, May),
                season!(Summer: Jun, Jul, Aug),
                season!(Autumn: Sep, Oct, Nov),
                season!(Winter: Dec),
            ][..]
        );
    }
}
