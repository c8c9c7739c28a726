use std::fmt;

use crate::cli::color::{self, Paint};
use crate::lib::{
    board::{Board, Cell},
    calendar::MonthInfo,
    schedule::{Intensity, Location},
};

/// Terminal rendering of a board
///
/// Header rows show seasons, months and week numbers, then each titled
/// section gets a title row and each item a row of week cells. A cell is
/// two characters wide.
pub struct Grid<'b> {
    board: &'b Board,
    paint: Paint,
}

/// Widest label column before names are truncated
const MAX_LABEL: usize = 40;
const CELL_WIDTH: usize = 2;

impl<'b> Grid<'b> {
    pub fn from(board: &'b Board) -> Self {
        Self { board, paint: Paint::OFF }
    }

    /// Use ANSI colours for cells
    pub fn with_color(mut self, color: bool) -> Self {
        self.paint = Paint::new(color);
        self
    }

    fn label_width(&self) -> usize {
        self.board
            .program()
            .sections
            .iter()
            .flat_map(|s| {
                std::iter::once(s.title.chars().count())
                    .chain(s.subtitle.iter().map(|t| t.chars().count() + 2))
                    .chain(s.items.iter().map(|i| i.name.chars().count()))
            })
            .max()
            .unwrap_or(0)
            .clamp(8, MAX_LABEL)
    }

    fn cell(&self, cell: Option<Cell>, target: bool) -> String {
        let glyph = match (cell, target) {
            (None, true) => "<>",
            (None, false) => "  ",
            (Some(c), _) => match c.intensity {
                Intensity::Heavy => "██",
                Intensity::Medium => "▓▓",
                Intensity::Light => "░░",
            },
        };
        let mut style = String::new();
        if target {
            style.push_str(color::REVERSE);
        }
        if let Some(c) = cell {
            if c.dragging {
                style.push_str(color::DIM);
            }
            style.push_str(color::category(c.category));
        }
        self.paint.wrap(&style, glyph)
    }
}

fn fit(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn month_width(m: &MonthInfo) -> usize {
    m.weeks as usize * CELL_WIDTH
}

// a row with a label and no cells
fn blank_row(f: &mut fmt::Formatter, text: &str, label: usize, months: &[MonthInfo]) -> fmt::Result {
    write!(f, "{} {:l$} ", VLINE, fit(text, label), l = label)?;
    for m in months {
        write!(f, "{}{:w$}", VLINE, "", w = month_width(m))?;
    }
    writeln!(f, "{}", VLINE)
}

impl fmt::Display for Grid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cal = self.board.calendar();
        let label = self.label_width();
        let months = cal.months();
        let season_widths = cal
            .seasons()
            .iter()
            .map(|s| cal.season_weeks(s) as usize * CELL_WIDTH + s.months.len() - 1)
            .collect::<Vec<_>>();
        // months that open a new season
        let mut boundaries = vec![false; months.len()];
        let mut idx = 0;
        for s in cal.seasons() {
            if let Some(b) = boundaries.get_mut(idx) {
                *b = true;
            }
            idx += s.months.len();
        }

        // upper border
        write!(f, "{}{}", ULCORNER, HLINE.repeat(label + 2))?;
        for w in &season_widths {
            write!(f, "{}{}", LOJOIN, HLINE.repeat(*w))?;
        }
        writeln!(f, "{}", URCORNER)?;
        // seasons
        write!(f, "{} {:l$} ", VLINE, "", l = label)?;
        for (s, w) in cal.seasons().iter().zip(&season_widths) {
            write!(f, "{}{:^w$}", VLINE, fit(&s.name.to_string(), *w), w = *w)?;
        }
        writeln!(f, "{}", VLINE)?;
        // separator
        write!(f, "{}{}", RTJOIN, HLINE.repeat(label + 2))?;
        for (m, first) in months.iter().zip(&boundaries) {
            let join = if *first { CROSS } else { LOJOIN };
            write!(f, "{}{}", join, HLINE.repeat(month_width(m)))?;
        }
        writeln!(f, "{}", LTJOIN)?;
        // months
        write!(f, "{} {:l$} ", VLINE, "", l = label)?;
        for m in months {
            let text = format!("{} ({}w)", m.month, m.weeks);
            let w = month_width(m);
            write!(f, "{}{:^w$}", VLINE, fit(&text, w), w = w)?;
        }
        writeln!(f, "{}", VLINE)?;
        // week numbers
        write!(f, "{} {:l$} ", VLINE, "", l = label)?;
        for m in months {
            write!(f, "{}", VLINE)?;
            for week in 1..=m.weeks {
                write!(f, "{:>2}", week)?;
            }
        }
        writeln!(f, "{}", VLINE)?;
        // separator
        write!(f, "{}{}", RTJOIN, HLINE.repeat(label + 2))?;
        for m in months {
            write!(f, "{}{}", CROSS, HLINE.repeat(month_width(m)))?;
        }
        writeln!(f, "{}", LTJOIN)?;

        // main block
        for (s, section) in self.board.program().sections.iter().enumerate() {
            if !section.title.is_empty() {
                blank_row(f, &section.title, label, months)?;
                if let Some(subtitle) = &section.subtitle {
                    blank_row(f, &format!("  {}", subtitle), label, months)?;
                }
            }
            for (i, item) in section.items.iter().enumerate() {
                let loc = Location { section: s, item: i };
                write!(f, "{} {:l$} ", VLINE, fit(&item.name, label), l = label)?;
                for m in months {
                    write!(f, "{}", VLINE)?;
                    for week in 1..=m.weeks {
                        let cell = self.board.cell(loc, m.month, week);
                        let target = self.board.is_target(m.month, week);
                        write!(f, "{}", self.cell(cell, target))?;
                    }
                }
                writeln!(f, "{}", VLINE)?;
            }
        }
        // lower border
        write!(f, "{}{}", DLCORNER, HLINE.repeat(label + 2))?;
        for m in months {
            write!(f, "{}{}", HIJOIN, HLINE.repeat(month_width(m)))?;
        }
        writeln!(f, "{}", DRCORNER)?;
        Ok(())
    }
}

const HLINE: &str = "─";
const VLINE: &str = "│";
const ULCORNER: &str = "┌";
const URCORNER: &str = "┐";
const DLCORNER: &str = "└";
const DRCORNER: &str = "┘";
const LTJOIN: &str = "┤";
const RTJOIN: &str = "├";
const HIJOIN: &str = "┴";
const LOJOIN: &str = "┬";
const CROSS: &str = "┼";

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::{
        calendar::{Calendar, Hemisphere},
        date::Month::*,
        schedule::{ApplicationPeriod, Category, Item, PeriodId, Program, Section},
    };

    fn board() -> Board {
        let program = Program {
            sections: vec![Section {
                title: "BASE PROTECTION - PYTHIUM".to_string(),
                subtitle: Some("Fields: Buckle, Corea".to_string()),
                items: vec![Item {
                    name: "Signature Xtra Stressgard @ 11 kg/ha".to_string(),
                    applications: vec![ApplicationPeriod {
                        id: PeriodId(0),
                        month: Jul,
                        start_week: 1,
                        duration: 3,
                        category: Category::Green,
                    }],
                }],
            }],
        };
        Board::new(Calendar::rolling(2025, Jul, Hemisphere::Southern), program)
    }

    #[test]
    fn aligned_plain_grid() {
        let b = board();
        let shown = format!("{}", Grid::from(&b));
        let widths = shown.lines().map(|l| l.chars().count()).collect::<Vec<_>>();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{}", shown);
        assert!(shown.contains("JUL (5w)"));
        assert!(shown.contains("AUG (4w)"));
        assert!(shown.contains("Winter"));
        assert!(shown.contains("  Fields: Buckle, Corea"));
        assert!(shown.contains("│██▓▓░░    │"));
        assert!(!shown.contains('\x1b'));
    }

    #[test]
    fn drop_target_marker() {
        let mut b = board();
        b.drag_start(PeriodId(0));
        b.drag_over(Aug, 2);
        let shown = format!("{}", Grid::from(&b));
        assert!(shown.contains("│  <>    │"), "{}", shown);
    }

    #[test]
    fn colored_cells() {
        let b = board();
        let shown = format!("{}", Grid::from(&b).with_color(true));
        assert!(shown.contains("\x1b[32m██\x1b[0m"));
    }
}
