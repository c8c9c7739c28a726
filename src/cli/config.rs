//! Command-line configuration

use chrono::Datelike;
use clap::{App, Arg, ArgMatches};

use crate::lib::{calendar::Hemisphere, date::Month};
use crate::load::error::Record;

/// Years accepted for the rolling window
const YEARS: std::ops::RangeInclusive<i32> = 1000..=9999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// seed program, `None` for the builtin one
    pub program: Option<String>,
    pub year: i32,
    pub start: Month,
    pub hemisphere: Hemisphere,
    /// write the SVG sheet here and exit
    pub print: Option<String>,
    /// print the grid once instead of starting the command loop
    pub batch: bool,
    pub color: bool,
}

fn app() -> App<'static, 'static> {
    App::new("turfplan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Plan seasonal turf-care applications on a rolling 12-month week grid")
        .arg(
            Arg::with_name("PROGRAM")
                .help("Program file to load instead of the builtin one")
                .index(1),
        )
        .arg(
            Arg::with_name("year")
                .short("y")
                .long("year")
                .takes_value(true)
                .value_name("YEAR")
                .help("Year of the first month of the window [default: current year]"),
        )
        .arg(
            Arg::with_name("start")
                .short("s")
                .long("start")
                .takes_value(true)
                .value_name("MON")
                .default_value("Jul")
                .help("First month of the window, as a label or a number"),
        )
        .arg(
            Arg::with_name("north")
                .long("north")
                .help("Use northern-hemisphere season names"),
        )
        .arg(
            Arg::with_name("print")
                .short("p")
                .long("print")
                .takes_value(true)
                .value_name("FILE")
                .help("Write the grid as an SVG sheet and exit"),
        )
        .arg(
            Arg::with_name("batch")
                .short("b")
                .long("batch")
                .help("Print the grid once and exit"),
        )
        .arg(
            Arg::with_name("no-color")
                .long("no-color")
                .help("Do not color the grid"),
        )
}

impl Config {
    /// Read the process arguments
    pub fn from_args(errs: &mut Record) -> Option<Self> {
        Self::from_matches(&app().get_matches(), errs)
    }

    /// Validate parsed arguments, registering every problem in `errs`
    pub fn from_matches(m: &ArgMatches, errs: &mut Record) -> Option<Self> {
        let year = match m.value_of("year") {
            None => Some(chrono::Local::now().year()),
            Some(text) => match text.parse::<i32>() {
                Ok(year) if YEARS.contains(&year) => Some(year),
                Ok(year) => {
                    errs.make("Unsupported year")
                        .text(format!("{} is outside of the supported range for years", year))
                        .hint("year should be between 1000 and 9999 inclusive");
                    None
                }
                Err(_) => {
                    errs.make("Invalid year")
                        .text(format!("'{}' is not a year", text))
                        .hint("pass a 4-digit year, e.g. --year 2025");
                    None
                }
            },
        };
        let start = match m.value_of("start").unwrap_or("Jul").parse::<Month>() {
            Ok(month) => Some(month),
            Err(e) => {
                errs.make("Invalid month")
                    .text(e)
                    .hint("Months are 'Jan', 'Feb', ..., 'Dec'");
                None
            }
        };
        let hemisphere = if m.is_present("north") {
            Hemisphere::Northern
        } else {
            Hemisphere::Southern
        };
        Some(Self {
            program: m.value_of("PROGRAM").map(String::from),
            year: year?,
            start: start?,
            hemisphere,
            print: m.value_of("print").map(String::from),
            batch: m.is_present("batch"),
            color: !m.is_present("no-color"),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> (Option<Config>, Record) {
        let mut errs = Record::new();
        let m = app().get_matches_from(std::iter::once("turfplan").chain(args.iter().copied()));
        (Config::from_matches(&m, &mut errs), errs)
    }

    #[test]
    fn defaults() {
        let (config, errs) = parse(&[]);
        assert!(errs.is_empty());
        let config = config.unwrap();
        assert_eq!(config.program, None);
        assert_eq!(config.start, Month::Jul);
        assert_eq!(config.hemisphere, Hemisphere::Southern);
        assert_eq!(config.year, chrono::Local::now().year());
        assert!(config.color);
        assert!(!config.batch);
    }

    #[test]
    fn explicit() {
        let (config, _) = parse(&["plan.prog", "-y", "2024", "--start", "jan", "--north", "-b", "--print", "out.svg"]);
        let config = config.unwrap();
        assert_eq!(config.program.as_deref(), Some("plan.prog"));
        assert_eq!(config.year, 2024);
        assert_eq!(config.start, Month::Jan);
        assert_eq!(config.hemisphere, Hemisphere::Northern);
        assert_eq!(config.print.as_deref(), Some("out.svg"));
        assert!(config.batch);
        let (config, _) = parse(&["--start", "9"]);
        assert_eq!(config.unwrap().start, Month::Sep);
    }

    #[test]
    fn invalid_values() {
        let (config, errs) = parse(&["--year", "20x5", "--start", "Jly"]);
        assert!(config.is_none());
        assert_eq!(errs.count_errors(), 2);
        let (config, errs) = parse(&["--year", "99"]);
        assert!(config.is_none());
        assert!(errs.labels().any(|l| l == "Unsupported year"));
    }
}
