//! Convert seed text into a program
//!
//! Every problem found is registered in an error `Record` rather than
//! returned, so that a single pass reports as much as possible.

use pest::Parser;
use pest_derive::Parser;

use crate::lib::{
    calendar::Calendar,
    date::Month,
    schedule::{clamp, ApplicationPeriod, Category, Item, PeriodId, Program, Section},
};
use crate::load::error::{Loc, Record};

#[derive(Parser)]
#[grammar = "load/program.pest"]
pub struct ProgramParser;

pub type Pair<'i> = pest::iterators::Pair<'i, Rule>;

/// Get the program described by `contents`
///
/// The return value may be non-empty even if some errors (including fatal ones) occured.
/// Caller should determine the success of this function not through its return value
/// but by querying `errs` (e.g. by checking `errs.is_fatal()`).
///
/// Periods are fitted to the weeks of `calendar` as they are read.
pub fn extract<'i>(
    path: &'i str,
    errs: &mut Record,
    contents: &'i str,
    calendar: &Calendar,
) -> Program {
    let program = match ProgramParser::parse(Rule::program, contents) {
        Ok(mut pairs) => match pairs.next() {
            Some(program) => program,
            None => return Program::default(),
        },
        Err(e) => {
            errs.make("Parsing failure").from(e.with_path(path));
            return Program::default();
        }
    };
    let mut builder = Builder {
        path,
        errs,
        calendar,
        next_id: 0,
    };
    let sections = program
        .into_inner()
        .filter(|p| p.as_rule() == Rule::section)
        .map(|p| builder.section(p))
        .collect();
    Program { sections }
}

struct Builder<'i, 'e> {
    path: &'i str,
    errs: &'e mut Record,
    calendar: &'e Calendar,
    next_id: usize,
}

// contents of a quoted string
fn unquote(pair: Pair) -> String {
    pair.into_inner()
        .next()
        .map(|text| text.as_str().to_string())
        .unwrap_or_default()
}

// extract four-element inner
macro_rules! quadruplet {
    ( $node:expr ) => {{
        let mut items = $node.into_inner();
        let fst = items.next().unwrap_or_else(|| panic!("No 1st"));
        let snd = items.next().unwrap_or_else(|| panic!("No 2nd"));
        let thr = items.next().unwrap_or_else(|| panic!("No 3rd"));
        let fth = items.next().unwrap_or_else(|| panic!("No 4th"));
        assert!(items.next().is_none());
        (fst, snd, thr, fth)
    }};
}

impl<'i, 'e> Builder<'i, 'e> {
    fn loc(&self, pair: &Pair<'i>) -> Loc<'i> {
        (self.path, pair.as_span())
    }

    fn section(&mut self, pair: Pair<'i>) -> Section {
        let mut quoted = Vec::new();
        let mut items = Vec::new();
        for p in pair.into_inner() {
            match p.as_rule() {
                Rule::quoted => quoted.push(unquote(p)),
                Rule::item => items.push(self.item(p)),
                _ => unreachable!("{:?}", p),
            }
        }
        let mut quoted = quoted.into_iter();
        Section {
            title: quoted.next().unwrap_or_default(),
            subtitle: quoted.next(),
            items,
        }
    }

    fn item(&mut self, pair: Pair<'i>) -> Item {
        let mut name = String::new();
        let mut applications = Vec::new();
        let mut locs = Vec::new();
        for p in pair.into_inner() {
            match p.as_rule() {
                Rule::quoted => name = unquote(p),
                Rule::application => {
                    let loc = self.loc(&p);
                    if let Some(period) = self.application(p) {
                        applications.push(period);
                        locs.push(loc);
                    }
                }
                _ => unreachable!("{:?}", p),
            }
        }
        let item = Item { name, applications };
        for (a, b) in item.overlaps() {
            let first = item.applications.iter().position(|p| p.id == a);
            let second = item.applications.iter().position(|p| p.id == b);
            if let (Some(first), Some(second)) = (first, second) {
                self.errs
                    .make("Overlapping periods")
                    .nonfatal()
                    .span(&locs[first], format!("{} in '{}'", a, item.name))
                    .span(&locs[second], format!("{} shares a week with it", b))
                    .hint("the first one listed is drawn on top, both can be moved");
            }
        }
        item
    }

    fn application(&mut self, pair: Pair<'i>) -> Option<ApplicationPeriod> {
        // safe to unpack because the grammar validated it already
        let (month, start, duration, category) = quadruplet!(pair);
        let month_loc = self.loc(&month);
        let month = match month.as_str().parse::<Month>() {
            Ok(m) => Some(m),
            Err(e) => {
                self.errs
                    .make("Invalid month")
                    .span(&month_loc, "provided here")
                    .text(e)
                    .hint("Months are 'Jan', 'Feb', ..., 'Dec'");
                None
            }
        };
        let start_week = self.week_number(start, "Invalid week", "weeks are numbered from 1");
        let duration = match duration.into_inner().next() {
            Some(n) => self.week_number(n, "Empty period", "a period lasts at least one week"),
            None => None,
        };
        let category_loc = self.loc(&category);
        let category = match category.as_str().parse::<Category>() {
            Ok(c) => Some(c),
            Err(e) => {
                self.errs
                    .make("Invalid category")
                    .span(&category_loc, "provided here")
                    .text(e)
                    .hint("Categories are blue, orange, green, red, purple");
                None
            }
        };
        let (month, start_week, duration, category) = (month?, start_week?, duration?, category?);
        let raw = ApplicationPeriod {
            id: PeriodId(self.next_id),
            month,
            start_week,
            duration,
            category,
        };
        self.next_id += 1;
        let weeks = self.calendar.weeks(month);
        let fitted = clamp(raw.clone(), weeks);
        if fitted != raw {
            log::debug!(
                "{} clamped from {} {} x{} to {} x{} ({} weeks)",
                raw.id,
                month,
                raw.start_week,
                raw.duration,
                fitted.start_week,
                fitted.duration,
                weeks,
            );
        }
        Some(fitted)
    }

    // a strictly positive number that fits a week count
    fn week_number(&mut self, pair: Pair<'i>, zero_label: &str, zero_hint: &str) -> Option<u8> {
        let loc = self.loc(&pair);
        match pair.as_str().parse::<u8>() {
            Ok(0) => {
                self.errs
                    .make(zero_label)
                    .span(&loc, "provided here")
                    .hint(zero_hint);
                None
            }
            Ok(n) => Some(n),
            Err(_) => {
                self.errs
                    .make("Number too large")
                    .span(&loc, "provided here")
                    .text(format!("'{}' does not fit in a month", pair.as_str()))
                    .hint("a month has at most 6 weeks");
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::{calendar::Hemisphere, date::Month::*};

    // Jul: 5 weeks, Aug: 4 weeks
    fn cal() -> Calendar {
        Calendar::rolling(2025, Jul, Hemisphere::Southern)
    }

    fn load(contents: &str) -> (Program, Record) {
        let mut errs = Record::new();
        let program = extract("test.prog", &mut errs, contents, &cal());
        (program, errs)
    }

    macro_rules! fails {
        ( $contents:expr => $label:expr ) => {{
            let (_, errs) = load($contents);
            assert!(errs.is_fatal(), "{}", $contents);
            assert!(errs.labels().any(|l| l == $label), "{}", errs);
        }};
    }

    #[test]
    fn sections_and_items() {
        let (program, errs) = load(
            r#"
            # leading comment
            section "" {
                item "Renovation" { Nov 2 x2 red; }
            }
            section "BASE - NUTRITION:" "Fields: All" {
                item "MP Foundation @ 20L/Ha" {
                    Jul 2 x1 blue;
                    aug 1 x2 BLUE;   # labels are case-insensitive
                }
                item "Empty" {}
            }
            "#,
        );
        assert!(errs.is_empty(), "{}", errs);
        assert_eq!(program.sections.len(), 2);
        assert_eq!(program.sections[0].title, "");
        assert_eq!(program.sections[0].subtitle, None);
        assert_eq!(program.sections[1].subtitle.as_deref(), Some("Fields: All"));
        let items = &program.sections[1].items;
        assert_eq!(items[0].name, "MP Foundation @ 20L/Ha");
        assert!(items[1].applications.is_empty());
        let ids = program.periods().map(|p| p.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![PeriodId(0), PeriodId(1), PeriodId(2)]);
        let p = &items[0].applications[1];
        assert_eq!((p.month, p.start_week, p.duration, p.category), (Aug, 1, 2, Category::Blue));
    }

    #[test]
    fn silently_clamped() {
        let (program, errs) = load(r#"section "" { item "a" { Aug 3 x3 green; Jul 9 x2 red; } }"#);
        assert!(errs.is_empty(), "{}", errs);
        let periods = program.periods().collect::<Vec<_>>();
        assert_eq!((periods[0].start_week, periods[0].duration), (3, 2));
        assert_eq!((periods[1].start_week, periods[1].duration), (5, 1));
    }

    #[test]
    fn overlap_is_a_warning() {
        let (program, errs) = load(r#"section "" { item "a" { Jul 1 x3 blue; Jul 3 x1 red; } }"#);
        assert!(!errs.is_fatal());
        assert_eq!(errs.count_warnings(), 1);
        assert_eq!(program.periods().count(), 2);
    }

    #[test]
    fn failures() {
        fails!(r#"section "" { item "a" { Jul 1 blue; } }"# => "Parsing failure");
        fails!(r#"section "" { item "a" { Jly 1 x1 blue; } }"# => "Invalid month");
        fails!(r#"section "" { item "a" { Jul 1 x1 pink; } }"# => "Invalid category");
        fails!(r#"section "" { item "a" { Jul 0 x1 blue; } }"# => "Invalid week");
        fails!(r#"section "" { item "a" { Jul 1 x0 blue; } }"# => "Empty period");
        fails!(r#"section "" { item "a" { Jul 300 x1 blue; } }"# => "Number too large");
    }

    #[test]
    fn several_errors_in_one_pass() {
        let (_, errs) = load(r#"section "" { item "a" { Jly 0 x1 pink; } }"#);
        assert_eq!(errs.count_errors(), 3);
    }
}
