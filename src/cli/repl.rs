//! Line-oriented front end for the board
//!
//! Each line is one event of a drag-and-drop gesture (`drag`, `over`,
//! `leave`, `drop`, `cancel`) or a request to display something.
//! Bad input is reported and otherwise ignored.

use std::io::{self, BufRead, Write};

use pest::Parser;

use crate::cli::{sheet::Sheet, table::Grid};
use crate::lib::{board::Board, date::Month, schedule::PeriodId};
use crate::load::{
    error::Record,
    parse::{Pair, ProgramParser, Rule},
};

const INPUT: &str = "<input>";
const DEFAULT_SHEET: &str = "program.svg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Drag(PeriodId),
    Over(Month, u8),
    Leave,
    Drop(Month, u8),
    Cancel,
    Move(PeriodId, Month, u8),
    Show,
    List,
    Months,
    Print(Option<String>),
    Help,
    Quit,
}

/// Parse one line of input
pub fn parse_command(line: &str, errs: &mut Record) -> Option<Command> {
    let command = match ProgramParser::parse(Rule::command, line) {
        Ok(mut pairs) => pairs.next()?.into_inner().next()?,
        Err(e) => {
            errs.make("Unknown command")
                .from(e.with_path(INPUT))
                .hint("type 'help' for the list of commands");
            return None;
        }
    };
    let rule = command.as_rule();
    let args = command.into_inner().collect::<Vec<_>>();
    Some(match rule {
        Rule::cmd_drag => Command::Drag(period_ref(&args[0], errs)?),
        Rule::cmd_over => Command::Over(month(&args[0], errs)?, week(&args[1], errs)?),
        Rule::cmd_leave => Command::Leave,
        Rule::cmd_drop => Command::Drop(month(&args[0], errs)?, week(&args[1], errs)?),
        Rule::cmd_cancel => Command::Cancel,
        Rule::cmd_move => {
            let id = period_ref(&args[0], errs);
            let month = month(&args[1], errs);
            let week = week(&args[2], errs);
            Command::Move(id?, month?, week?)
        }
        Rule::cmd_show => Command::Show,
        Rule::cmd_list => Command::List,
        Rule::cmd_months => Command::Months,
        Rule::cmd_print => Command::Print(args.first().map(|p| p.as_str().to_string())),
        Rule::cmd_help => Command::Help,
        Rule::cmd_quit => Command::Quit,
        _ => unreachable!("{:?}", rule),
    })
}

fn period_ref(pair: &Pair, errs: &mut Record) -> Option<PeriodId> {
    let digits = pair.as_str().trim_start_matches("app-");
    match digits.parse::<usize>() {
        Ok(n) => Some(PeriodId(n)),
        Err(_) => {
            errs.make("Invalid period id")
                .span(&(INPUT, pair.as_span()), "provided here")
                .hint("use an id shown by 'list'");
            None
        }
    }
}

fn month(pair: &Pair, errs: &mut Record) -> Option<Month> {
    match pair.as_str().parse::<Month>() {
        Ok(m) => Some(m),
        Err(e) => {
            errs.make("Invalid month")
                .span(&(INPUT, pair.as_span()), "provided here")
                .text(e)
                .hint("Months are 'Jan', 'Feb', ..., 'Dec'");
            None
        }
    }
}

fn week(pair: &Pair, errs: &mut Record) -> Option<u8> {
    match pair.as_str().parse::<u8>() {
        Ok(w) => Some(w),
        Err(_) => {
            errs.make("Invalid week")
                .span(&(INPUT, pair.as_span()), "provided here")
                .hint("weeks are numbered 1 to 6");
            None
        }
    }
}

const HELP: &str = "\
commands:
  drag ID          pick up a period (ids are shown by 'list')
  over MON WEEK    hover the dragged period over a cell
  leave            stop hovering
  drop MON WEEK    release the dragged period on a cell
  cancel           abandon the current drag
  move ID MON WEEK drag and drop in one step
  show             draw the grid
  list             list items and their periods
  months           list the months of the window
  print [FILE]     write the grid as an SVG sheet
  help             this message
  quit             leave";

/// A board driven by text commands
pub struct Session {
    board: Board,
    color: bool,
}

impl Session {
    pub fn new(board: Board, color: bool) -> Self {
        Self { board, color }
    }

    #[cfg(test)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Read commands until `quit` or end of input
    pub fn run<R, W>(&mut self, input: R, mut out: W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        write!(out, "{}", Grid::from(&self.board).with_color(self.color))?;
        writeln!(out, "type 'help' for the list of commands")?;
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut errs = Record::new().with_color(self.color);
            match parse_command(&line, &mut errs) {
                Some(Command::Quit) => break,
                Some(cmd) => self.execute(cmd, &mut out)?,
                None => write!(out, "{}", errs)?,
            }
        }
        Ok(())
    }

    /// Apply one command, describing the outcome on `out`
    pub fn execute<W>(&mut self, cmd: Command, out: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        match cmd {
            Command::Drag(id) => {
                if self.board.drag_start(id) {
                    writeln!(out, "dragging {}", id)?;
                } else {
                    writeln!(out, "no period {}", id)?;
                }
            }
            Command::Over(month, week) => {
                if self.board.dragging().is_some() {
                    self.board.drag_over(month, week);
                    write!(out, "{}", Grid::from(&self.board).with_color(self.color))?;
                } else {
                    writeln!(out, "nothing is being dragged")?;
                }
            }
            Command::Leave => self.board.drag_leave(),
            Command::Drop(month, week) => {
                let id = self.board.dragging().map(|d| d.id);
                let moved = self.board.drop(month, week);
                self.report(out, id, moved, month, week)?;
            }
            Command::Cancel => {
                self.board.drag_end();
                writeln!(out, "drag cancelled")?;
            }
            Command::Move(id, month, week) => {
                if self.board.program().locate(id).is_none() {
                    writeln!(out, "no period {}", id)?;
                } else {
                    let moved = self.board.move_period(id, month, week);
                    self.report(out, Some(id), moved, month, week)?;
                }
            }
            Command::Show => write!(out, "{}", Grid::from(&self.board).with_color(self.color))?,
            Command::List => self.list(out)?,
            Command::Months => {
                let cal = self.board.calendar();
                writeln!(
                    out,
                    "window starts {} {}, {} week columns",
                    cal.start(),
                    cal.year(),
                    cal.total_weeks(),
                )?;
                for m in cal.months() {
                    writeln!(out, "{:>2}. {} {} ({} weeks)", m.position + 1, m.month, m.year, m.weeks)?;
                }
            }
            Command::Print(file) => {
                let file = file.as_deref().unwrap_or(DEFAULT_SHEET);
                match Sheet::from(&self.board).save(file) {
                    Ok(()) => writeln!(out, "sheet written to {}", file)?,
                    Err(e) => writeln!(out, "could not write {}: {}", file, e)?,
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => (),
        }
        Ok(())
    }

    fn report<W>(
        &self,
        out: &mut W,
        id: Option<PeriodId>,
        moved: bool,
        month: Month,
        week: u8,
    ) -> io::Result<()>
    where
        W: Write,
    {
        match (id, moved) {
            (None, _) => writeln!(out, "nothing is being dragged"),
            (Some(id), true) => {
                write!(out, "{}", Grid::from(&self.board).with_color(self.color))?;
                writeln!(out, "moved {} to {} week {}", id, month, week)
            }
            (Some(id), false) if !self.board.calendar().contains(month, week) => writeln!(
                out,
                "{} not moved: {} has weeks 1 to {}",
                id,
                month,
                self.board.calendar().weeks(month),
            ),
            (Some(id), false) => writeln!(out, "{} not moved", id),
        }
    }

    fn list<W>(&self, out: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        for section in &self.board.program().sections {
            if !section.title.is_empty() {
                writeln!(out, "{}", section.title)?;
            }
            for item in &section.items {
                writeln!(out, "  {}", item.name)?;
                for p in &item.applications {
                    writeln!(
                        out,
                        "    {:<8} {} week {} x{} {}",
                        p.id.to_string(),
                        p.month,
                        p.start_week,
                        p.duration,
                        p.category,
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::{
        calendar::{Calendar, Hemisphere},
        date::Month::*,
        schedule::{ApplicationPeriod, Category, Item, Program, Section},
    };

    macro_rules! parses {
        ( $line:expr => $cmd:expr ) => {{
            let mut errs = Record::new();
            assert_eq!(parse_command($line, &mut errs), Some($cmd), "{}", errs);
        }};
    }

    macro_rules! rejects {
        ( $line:expr => $label:expr ) => {{
            let mut errs = Record::new();
            assert_eq!(parse_command($line, &mut errs), None);
            assert!(errs.labels().any(|l| l == $label), "{}", errs);
        }};
    }

    #[test]
    fn commands() {
        parses!("drag app-3" => Command::Drag(PeriodId(3)));
        parses!("drag 12" => Command::Drag(PeriodId(12)));
        parses!("over Aug 2" => Command::Over(Aug, 2));
        parses!("  drop  SEP 4 " => Command::Drop(Sep, 4));
        parses!("move app-0 jan 1" => Command::Move(PeriodId(0), Jan, 1));
        parses!("leave" => Command::Leave);
        parses!("cancel" => Command::Cancel);
        parses!("show" => Command::Show);
        parses!("list" => Command::List);
        parses!("months" => Command::Months);
        parses!("print" => Command::Print(None));
        parses!("print out/plan.svg" => Command::Print(Some("out/plan.svg".to_string())));
        parses!("help" => Command::Help);
        parses!("exit" => Command::Quit);
    }

    #[test]
    fn bad_commands() {
        rejects!("jump app-1" => "Unknown command");
        rejects!("drop Aug" => "Unknown command");
        rejects!("drop Jly 2" => "Invalid month");
        rejects!("over Aug 999" => "Invalid week");
        rejects!("drag app-99999999999999999999999" => "Invalid period id");
    }

    fn session() -> Session {
        let program = Program {
            sections: vec![Section {
                title: String::new(),
                subtitle: None,
                items: vec![Item {
                    name: "Private event".to_string(),
                    applications: vec![ApplicationPeriod {
                        id: PeriodId(0),
                        month: Sep,
                        start_week: 4,
                        duration: 1,
                        category: Category::Purple,
                    }],
                }],
            }],
        };
        let cal = Calendar::rolling(2025, Jul, Hemisphere::Southern);
        Session::new(Board::new(cal, program), false)
    }

    fn period(s: &Session) -> (Month, u8, u8) {
        let p = s.board().program().periods().next().unwrap();
        (p.month, p.start_week, p.duration)
    }

    #[test]
    fn gesture_through_text() {
        let mut s = session();
        let input = "drag app-0\nover Oct 1\n\nbogus\ndrop Oct 2\nquit\nmove app-0 Nov 1\n";
        let mut out = Vec::new();
        s.run(input.as_bytes(), &mut out).unwrap();
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("dragging app-0"));
        assert!(shown.contains("Unknown command"));
        assert!(shown.contains("moved app-0 to OCT week 2"));
        // nothing after quit is executed
        assert_eq!(period(&s), (Oct, 2, 1));
        assert!(s.board().dragging().is_none());
    }

    #[test]
    fn rejected_and_cancelled() {
        let mut s = session();
        let mut out = Vec::new();
        s.execute(Command::Move(PeriodId(0), Aug, 5), &mut out).unwrap();
        s.execute(Command::Drag(PeriodId(0)), &mut out).unwrap();
        s.execute(Command::Cancel, &mut out).unwrap();
        s.execute(Command::Drop(Jul, 1), &mut out).unwrap();
        s.execute(Command::Drag(PeriodId(7)), &mut out).unwrap();
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("app-0 not moved: AUG has weeks 1 to 4"));
        assert!(shown.contains("drag cancelled"));
        assert!(shown.contains("nothing is being dragged"));
        assert!(shown.contains("no period app-7"));
        assert_eq!(period(&s), (Sep, 4, 1));
    }

    #[test]
    fn move_unknown_period() {
        let mut s = session();
        let mut out = Vec::new();
        s.execute(Command::Move(PeriodId(999), Jul, 1), &mut out).unwrap();
        let shown = String::from_utf8(out).unwrap();
        assert_eq!(shown, "no period app-999\n");
        assert_eq!(period(&s), (Sep, 4, 1));
    }

    #[test]
    fn plain_diagnostics() {
        let mut s = session();
        let mut out = Vec::new();
        s.run("drop Jly 2\n".as_bytes(), &mut out).unwrap();
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("Invalid month"));
        assert!(!shown.contains('\x1b'));
    }

    #[test]
    fn listings() {
        let mut s = session();
        let mut out = Vec::new();
        s.execute(Command::List, &mut out).unwrap();
        s.execute(Command::Months, &mut out).unwrap();
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("app-0    SEP week 4 x1 purple"));
        assert!(shown.contains("window starts JUL 2025, 52 week columns"));
        assert!(shown.contains(" 1. JUL 2025 (5 weeks)"));
        assert!(shown.contains("12. JUN 2026"));
    }
}
