//! Diagnostics for programs and commands
//!
//! An `Error` is one report: a label, then source excerpts, notes and
//! hints. A `Record` collects the reports of one load or one command line
//! and prints them, colored or not.
//!
//! ```rust
//! errs.make("Overlapping periods")
//!     .nonfatal()
//!     .span(&first, "this period")
//!     .span(&second, "shares a week with this one")
//!     .hint("the first one is drawn on top");
//! ```
//!
//! ```txt
//! warning: Overlapping periods
//!    --> data/turf.prog:12:9
//!    |
//! 12 |         Jul 1 x3 blue;
//!    |         ^^^^^^^^^^^^^^ this period
//!   ...
//!    --> data/turf.prog:13:9
//!    |
//! 13 |         Jul 3 x1 blue;
//!    |         ^^^^^^^^^^^^^^ shares a week with this one
//!   = hint: the first one is drawn on top
//!
//! 1 warning reported
//! ```

use std::fmt;

use pest::error::LineColLocation;

use crate::cli::color::{Paint, BOLD, CYAN, RED, YELLOW};
use crate::load::parse::Rule;

/// File name and span of the text an error is about
pub type Loc<'i> = (&'i str, pest::Span<'i>);

/// Reports shown before the rest is summarized
const MAX_SHOWN: usize = 10;

/// One report
#[must_use]
#[derive(Debug)]
pub struct Error {
    /// warnings never stop a load
    fatal: bool,
    label: String,
    items: Vec<Item>,
}

#[derive(Debug)]
enum Item {
    Excerpt(Excerpt),
    Note(String),
    Hint(String),
}

/// One line of source with a marked range
#[derive(Debug, PartialEq, Eq)]
struct Excerpt {
    path: String,
    /// 1-based
    line: usize,
    /// 1-based, in characters
    col: usize,
    /// marked characters, at least 1
    width: usize,
    source: String,
    message: String,
}

impl Excerpt {
    fn of_span(path: &str, span: &pest::Span, message: String) -> Self {
        let start = span.start_pos();
        let (line, col) = start.line_col();
        let source = start.line_of().trim_end().to_string();
        let width = match span.end_pos().line_col() {
            (end_line, end_col) if end_line == line => end_col - col,
            // only the first line of a longer span is shown
            _ => (source.chars().count() + 1).saturating_sub(col),
        };
        Self {
            path: path.to_string(),
            line,
            col,
            width: width.max(1),
            source,
            message,
        }
    }

    fn of_pest(err: pest::error::Error<Rule>) -> Self {
        let err = err.renamed_rules(rule_rename);
        let source = err.line().trim_end().to_string();
        let ((line, col), width) = match err.line_col.clone() {
            LineColLocation::Pos(pos) => (pos, 1),
            LineColLocation::Span(start, end) if start.0 == end.0 => (start, end.1 - start.1),
            LineColLocation::Span(start, _) => {
                (start, (source.chars().count() + 1).saturating_sub(start.1))
            }
        };
        Self {
            path: err.path().unwrap_or("<input>").to_string(),
            line,
            col,
            width: width.max(1),
            source,
            message: err.variant.message().to_string(),
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, paint: Paint, level: &str) -> fmt::Result {
        let number = self.line.to_string();
        let pad = " ".repeat(number.len());
        let bar = paint.wrap(CYAN, "|");
        // keep tabs so that the marker lines up with the source
        let indent = self
            .source
            .chars()
            .take(self.col.saturating_sub(1))
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect::<String>();
        writeln!(f, "{} {} {}:{}:{}", pad, paint.wrap(CYAN, "-->"), self.path, self.line, self.col)?;
        writeln!(f, "{} {}", pad, bar)?;
        writeln!(f, "{} {} {}", paint.wrap(CYAN, number), bar, self.source)?;
        writeln!(
            f,
            "{} {} {}{} {}",
            pad,
            bar,
            indent,
            paint.wrap(level, "^".repeat(self.width)),
            paint.wrap(level, &self.message),
        )
    }
}

/// All reports of one load or one command
#[must_use]
#[derive(Debug)]
pub struct Record {
    contents: Vec<Error>,
    paint: Paint,
}

impl Error {
    fn new(label: String) -> Self {
        Self {
            fatal: true,
            label,
            items: Vec::new(),
        }
    }

    /// Downgrade to a warning
    pub fn nonfatal(&mut self) -> &mut Self {
        self.fatal = false;
        self
    }

    /// Show where a parse failed
    pub fn from(&mut self, err: pest::error::Error<Rule>) -> &mut Self {
        self.items.push(Item::Excerpt(Excerpt::of_pest(err)));
        self
    }

    /// Mark `loc` with a short message
    pub fn span<S>(&mut self, loc: &Loc, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items
            .push(Item::Excerpt(Excerpt::of_span(loc.0, &loc.1, msg.to_string())));
        self
    }

    pub fn text<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Note(msg.to_string()));
        self
    }

    /// Suggest a fix
    pub fn hint<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Hint(msg.to_string()));
        self
    }

    fn level(&self) -> (&'static str, &'static str) {
        if self.fatal {
            (RED, "error")
        } else {
            (YELLOW, "warning")
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, paint: Paint) -> fmt::Result {
        let (level, name) = self.level();
        writeln!(f, "{}: {}", paint.wrap(level, name), paint.wrap(BOLD, &self.label))?;
        let mut excerpts = 0;
        for item in &self.items {
            match item {
                Item::Excerpt(excerpt) => {
                    if excerpts > 0 {
                        writeln!(f, "  ...")?;
                    }
                    excerpts += 1;
                    excerpt.render(f, paint, level)?;
                }
                Item::Note(txt) => writeln!(f, "  {} {}", paint.wrap(CYAN, "="), txt)?,
                Item::Hint(txt) => writeln!(f, "  {} {}", paint.wrap(CYAN, "= hint:"), txt)?,
            }
        }
        Ok(())
    }
}

impl Default for Record {
    fn default() -> Self {
        Self {
            contents: Vec::new(),
            paint: Paint::ON,
        }
    }
}

impl Record {
    /// An empty record that prints in color
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.paint = Paint::new(color);
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.contents.iter().any(|e| e.fatal)
    }

    pub fn count_errors(&self) -> usize {
        self.contents.iter().filter(|e| e.fatal).count()
    }

    pub fn count_warnings(&self) -> usize {
        self.contents.len() - self.count_errors()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Labels of all reports, in order
    #[cfg(test)]
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.contents.iter().map(|e| e.label.as_str())
    }

    /// Start a new fatal report
    pub fn make<S>(&mut self, label: S) -> &mut Error
    where
        S: ToString,
    {
        self.contents.push(Error::new(label.to_string()));
        let last = self.contents.len() - 1;
        &mut self.contents[last]
    }
}

/// Errors hide warnings: a record with any error shows only its errors
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fatal = self.is_fatal();
        let shown = self.contents.iter().filter(|e| e.fatal == fatal);
        let count = shown.clone().count();
        if count == 0 {
            return Ok(());
        }
        for err in shown.take(MAX_SHOWN) {
            err.render(f, self.paint)?;
            writeln!(f)?;
        }
        if count > MAX_SHOWN {
            writeln!(f, "... and {} more", count - MAX_SHOWN)?;
        }
        let (level, name) = if fatal { (RED, "error") } else { (YELLOW, "warning") };
        let plural = if count == 1 { "" } else { "s" };
        writeln!(f, "{}", self.paint.wrap(level, format!("{} {}{} reported", count, name, plural)))
    }
}

fn rule_rename(r: &Rule) -> String {
    String::from(match r {
        Rule::EOI => "EOF",
        Rule::WHITESPACE => "whitespace",
        Rule::COMMENT => "a comment",
        Rule::number => "a number",
        Rule::text => "a string of non-'\"' characters",
        Rule::quoted => "a quoted string ('\"foo\"')",
        Rule::month => "a month ('Jan' ... 'Dec')",
        Rule::category => "a category (blue, orange, green, red, purple)",
        Rule::duration => "a duration ('x2')",
        Rule::application => "an application 'Mmm WEEK xDURATION category;'",
        Rule::item => "an item 'item \"NAME\" { ... }'",
        Rule::section => "a section 'section \"TITLE\" \"SUBTITLE\"? { ... }'",
        Rule::program => "a sequence of sections",
        Rule::period_ref => "a period id ('app-12' or '12')",
        Rule::path => "a file path",
        Rule::cmd_drag => "'drag ID'",
        Rule::cmd_over => "'over MON WEEK'",
        Rule::cmd_leave => "'leave'",
        Rule::cmd_drop => "'drop MON WEEK'",
        Rule::cmd_cancel => "'cancel'",
        Rule::cmd_move => "'move ID MON WEEK'",
        Rule::cmd_show => "'show'",
        Rule::cmd_list => "'list'",
        Rule::cmd_months => "'months'",
        Rule::cmd_print => "'print [FILE]'",
        Rule::cmd_help => "'help'",
        Rule::cmd_quit => "'quit'",
        Rule::command => "a command",
        #[allow(unreachable_patterns)]
        _ => "a token",
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use pest::Parser;

    use crate::load::parse::ProgramParser;

    const SOURCE: &str = "section \"\" {\n    item \"Wetting agent\" {\n        Jly 2 x2 blue;\n    }\n}\n";

    // span of the first occurrence of `needle` in `SOURCE`
    fn loc(needle: &str) -> Loc<'static> {
        let start = SOURCE.find(needle).unwrap();
        ("plan.prog", pest::Span::new(SOURCE, start, start + needle.len()).unwrap())
    }

    #[test]
    fn counting() {
        let mut errs = Record::new();
        assert!(errs.is_empty());
        assert_eq!(format!("{}", errs), "");
        errs.make("Overlapping periods").nonfatal().text("kept both");
        assert!(!errs.is_fatal());
        assert_eq!(errs.count_warnings(), 1);
        assert!(format!("{}", errs).contains("1 warning reported"));
        errs.make("Invalid month").hint("Months are 'Jan', 'Feb', ..., 'Dec'");
        assert!(errs.is_fatal());
        assert_eq!(errs.count_errors(), 1);
        assert_eq!(errs.count_warnings(), 1);
        let shown = format!("{}", errs);
        assert!(shown.contains("Invalid month"));
        assert!(!shown.contains("Overlapping periods"));
        assert!(shown.contains("1 error reported"));
        assert_eq!(errs.labels().collect::<Vec<_>>(), vec!["Overlapping periods", "Invalid month"]);
    }

    #[test]
    fn truncation() {
        let mut errs = Record::new();
        for i in 0..12 {
            errs.make(format!("failure {}", i));
        }
        let shown = format!("{}", errs);
        assert!(shown.contains("... and 2 more"));
        assert!(shown.contains("12 errors reported"));
        assert!(shown.contains("failure 9"));
        assert!(!shown.contains("failure 10"));
    }

    #[test]
    fn plain_excerpt() {
        let mut errs = Record::new().with_color(false);
        errs.make("Invalid month")
            .span(&loc("Jly"), "provided here")
            .text("'Jly' is not a valid month")
            .hint("Months are 'Jan', 'Feb', ..., 'Dec'");
        let shown = format!("{}", errs);
        assert!(!shown.contains('\x1b'));
        let expected = "\
error: Invalid month
  --> plan.prog:3:9
  |
3 |         Jly 2 x2 blue;
  |         ^^^ provided here
  = 'Jly' is not a valid month
  = hint: Months are 'Jan', 'Feb', ..., 'Dec'

1 error reported
";
        assert_eq!(shown, expected);
    }

    #[test]
    fn colored_excerpt() {
        let mut errs = Record::new();
        errs.make("Overlapping periods")
            .nonfatal()
            .span(&loc("Jly 2 x2 blue;"), "this period");
        let shown = format!("{}", errs);
        assert!(shown.contains("\x1b[1;93mwarning\x1b[0m"));
        assert!(shown.contains("\x1b[1;93m^^^^^^^^^^^^^^\x1b[0m"));
    }

    #[test]
    fn parse_failure() {
        let err = match ProgramParser::parse(Rule::command, "drop Aug") {
            Ok(_) => panic!("'drop Aug' should not parse"),
            Err(e) => e.with_path("<input>"),
        };
        let mut errs = Record::new().with_color(false);
        errs.make("Unknown command").from(err);
        let shown = format!("{}", errs);
        assert!(shown.contains("--> <input>:1:"), "{}", shown);
        assert!(shown.contains("1 | drop Aug"), "{}", shown);
        assert!(shown.contains("a number"), "{}", shown);
    }
}
