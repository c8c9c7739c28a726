//! Application periods and the groups they are presented in
//!
//! The operations here are pure: `clamp` and `move_period` take a value and
//! return a new one, leaving the input untouched, and `period_at` only reads.
//! The single mutable owner of a program lives in `board`.

use std::fmt;
use std::str::FromStr;

use crate::lib::{calendar::Calendar, date::Month};

/// Identity of a period, unique across a program and stable for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodId(pub usize);

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "app-{}", self.0)
    }
}

/// Display colour of a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Blue,
    Orange,
    Green,
    Red,
    Purple,
}

impl Category {
    pub const ALL: [Category; 5] = {
        use Category::*;
        [Blue, Orange, Green, Red, Purple]
    };

    pub fn name(self) -> &'static str {
        use Category::*;
        match self {
            Blue => "blue",
            Orange => "orange",
            Green => "green",
            Red => "red",
            Purple => "purple",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Text that does not name a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid category", self.0)
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// How strongly a week of a period is shaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intensity {
    Heavy,
    Medium,
    Light,
}

impl Intensity {
    /// Tier of the `position`-th week (1-based) of a period
    pub fn at(position: u8) -> Self {
        match position {
            0 | 1 => Intensity::Heavy,
            2 => Intensity::Medium,
            _ => Intensity::Light,
        }
    }
}

/// A block of consecutive weeks inside one month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationPeriod {
    pub id: PeriodId,
    pub month: Month,
    /// 1-based week column
    pub start_week: u8,
    /// number of weeks, at least 1
    pub duration: u8,
    pub category: Category,
}

impl ApplicationPeriod {
    /// Last week covered (inclusive)
    pub fn end_week(&self) -> u8 {
        self.start_week.saturating_add(self.duration).saturating_sub(1)
    }

    /// 1-based position of `week` within the period, if covered
    pub fn position(&self, month: Month, week: u8) -> Option<u8> {
        if self.month == month && self.start_week <= week && week <= self.end_week() {
            Some(week - self.start_week + 1)
        } else {
            None
        }
    }

    /// Whether two periods share a week
    pub fn overlaps(&self, other: &Self) -> bool {
        self.month == other.month
            && self.start_week <= other.end_week()
            && other.start_week <= self.end_week()
    }
}

/// Fit a period inside a month of `weeks` columns
///
/// The start week is pulled back to at most `weeks`, then the duration is
/// truncated so that the period ends on or before the last column. A period
/// with `start_week >= 1` stays that way. Idempotent.
pub fn clamp(period: ApplicationPeriod, weeks: u8) -> ApplicationPeriod {
    let start_week = period.start_week.clamp(1, weeks.max(1));
    let duration = period.duration.min(weeks.saturating_sub(start_week) + 1);
    ApplicationPeriod { start_week, duration, ..period }
}

/// First period covering `week` of `month`, along with the week's position in it
///
/// Periods are scanned in order; when two overlap the earlier one is reported.
pub fn period_at(
    periods: &[ApplicationPeriod],
    month: Month,
    week: u8,
) -> Option<(&ApplicationPeriod, u8)> {
    periods
        .iter()
        .find_map(|p| p.position(month, week).map(|pos| (p, pos)))
}

/// A named line of the program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub applications: Vec<ApplicationPeriod>,
}

impl Item {
    pub fn period_at(&self, month: Month, week: u8) -> Option<(&ApplicationPeriod, u8)> {
        period_at(&self.applications, month, week)
    }

    pub fn find(&self, id: PeriodId) -> Option<&ApplicationPeriod> {
        self.applications.iter().find(|p| p.id == id)
    }

    /// Pairs of periods of this item that share a week
    pub fn overlaps(&self) -> Vec<(PeriodId, PeriodId)> {
        let mut pairs = Vec::new();
        for (i, a) in self.applications.iter().enumerate() {
            for b in &self.applications[i + 1..] {
                if a.overlaps(b) {
                    pairs.push((a.id, b.id));
                }
            }
        }
        pairs
    }
}

/// Reschedule one period of `item` to start at `week` of `month`, a month
/// with `weeks` columns
///
/// Returns `None`, meaning nothing changes, when the id is not in the item
/// or the week is not a column of the target month. Otherwise the returned
/// item differs from the input in exactly that period: its month and start
/// are the target, its duration is truncated to fit before the end of the
/// month, and its id and category are kept.
pub fn move_period(
    item: &Item,
    id: PeriodId,
    month: Month,
    week: u8,
    weeks: u8,
) -> Option<Item> {
    let index = item.applications.iter().position(|p| p.id == id)?;
    if !(1..=weeks).contains(&week) {
        return None;
    }
    let dragged = &item.applications[index];
    let moved = ApplicationPeriod {
        month,
        start_week: week,
        duration: dragged.duration.min(weeks - week + 1),
        ..dragged.clone()
    };
    let mut applications = item.applications.clone();
    applications[index] = clamp(moved, weeks);
    Some(Item { name: item.name.clone(), applications })
}

/// A titled group of items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// may be empty, in which case no title row is drawn
    pub title: String,
    pub subtitle: Option<String>,
    pub items: Vec<Item>,
}

/// Where an item sits in a program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub section: usize,
    pub item: usize,
}

/// The whole schedule: an immutable snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub sections: Vec<Section>,
}

impl Program {
    pub fn item(&self, loc: Location) -> Option<&Item> {
        self.sections.get(loc.section)?.items.get(loc.item)
    }

    /// Find the item owning period `id`
    pub fn locate(&self, id: PeriodId) -> Option<Location> {
        self.sections.iter().enumerate().find_map(|(s, section)| {
            section
                .items
                .iter()
                .position(|item| item.find(id).is_some())
                .map(|i| Location { section: s, item: i })
        })
    }

    /// Copy of the program with the item at `loc` replaced
    pub fn with_item(&self, loc: Location, item: Item) -> Self {
        let mut next = self.clone();
        if let Some(slot) = next
            .sections
            .get_mut(loc.section)
            .and_then(|s| s.items.get_mut(loc.item))
        {
            *slot = item;
        }
        next
    }

    /// Copy of the program with every period clamped to its month
    pub fn clamped(&self, calendar: &Calendar) -> Self {
        let mut next = self.clone();
        for item in next.sections.iter_mut().flat_map(|s| s.items.iter_mut()) {
            for p in item.applications.iter_mut() {
                *p = clamp(p.clone(), calendar.weeks(p.month));
            }
        }
        next
    }

    pub fn periods(&self) -> impl Iterator<Item = &ApplicationPeriod> {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter())
            .flat_map(|i| i.applications.iter())
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}
