//! Printable rendering of a board as an SVG document

use std::io;

use svg::{
    node::element::{Group, Line, Rectangle, Text},
    Document,
};

use crate::lib::{
    board::{Board, Cell},
    calendar::SeasonName,
    schedule::{Category, Intensity, Location},
};

pub struct Sheet<'b> {
    board: &'b Board,
}

const LABEL_WIDTH: f64 = 320.0;
const CELL: f64 = 24.0;
const ROW: f64 = 28.0;
const TITLE: f64 = 48.0;
const MARGIN: f64 = 20.0;
const FONT: &str = "sans-serif";

impl<'b> Sheet<'b> {
    pub fn from(board: &'b Board) -> Self {
        Self { board }
    }

    /// Write the document to `file`
    pub fn save(&self, file: &str) -> io::Result<()> {
        svg::save(file, &self.document())?;
        log::info!("Sheet written to {}", file);
        Ok(())
    }

    pub fn document(&self) -> Document {
        let cal = self.board.calendar();
        let width = LABEL_WIDTH + cal.total_weeks() as f64 * CELL;
        let mut doc = Document::new().add(text(0.0, 32.0, "Turf Tracker", 24.0, "bold"));

        // seasons
        let mut y = TITLE;
        let mut x = LABEL_WIDTH;
        for season in cal.seasons() {
            let w = cal.season_weeks(season) as f64 * CELL;
            doc = doc
                .add(rect(x, y, w, ROW, season_fill(season.name)))
                .add(centered(x + w / 2.0, y + 19.0, &season.name.to_string(), 13.0));
            x += w;
        }
        // months
        y += ROW;
        x = LABEL_WIDTH;
        for m in cal.months() {
            let w = m.weeks as f64 * CELL;
            let label = format!("{} ({}w)", m.month, m.weeks);
            doc = doc
                .add(rect(x, y, w, ROW, "white"))
                .add(centered(x + w / 2.0, y + 18.0, &label, 11.0));
            x += w;
        }
        y += ROW;

        // rows
        for (s, section) in self.board.program().sections.iter().enumerate() {
            if !section.title.is_empty() {
                doc = doc
                    .add(rect(0.0, y, width, ROW, "#f9fafb"))
                    .add(text(8.0, y + 18.0, &section.title, 13.0, "bold"));
                y += ROW;
                if let Some(subtitle) = &section.subtitle {
                    doc = doc.add(text(8.0, y + 16.0, subtitle, 11.0, "normal"));
                    y += ROW;
                }
            }
            for (i, item) in section.items.iter().enumerate() {
                let loc = Location { section: s, item: i };
                doc = doc.add(text(8.0, y + 18.0, &item.name, 13.0, "normal"));
                doc = doc.add(self.row(loc, y));
                y += ROW;
            }
        }
        doc.add(
            Line::new()
                .set("x1", LABEL_WIDTH)
                .set("x2", LABEL_WIDTH)
                .set("y1", TITLE)
                .set("y2", y)
                .set("stroke", "#e5e7eb"),
        )
        .set("viewBox", (-MARGIN, -MARGIN, width + 2.0 * MARGIN, y + 2.0 * MARGIN))
    }

    fn row(&self, loc: Location, y: f64) -> Group {
        let mut group = Group::new();
        let mut x = LABEL_WIDTH;
        for m in self.board.calendar().months() {
            for week in 1..=m.weeks {
                let shade = if week % 2 == 1 { "#f3f4f6" } else { "white" };
                let shade = if self.board.is_target(m.month, week) { "#dbeafe" } else { shade };
                group = group.add(rect(x, y, CELL, ROW, shade));
                if let Some(cell) = self.board.cell(loc, m.month, week) {
                    group = group.add(block(x, y, cell));
                }
                x += CELL;
            }
        }
        group
    }
}

fn rect(x: f64, y: f64, w: f64, h: f64, fill: &str) -> Rectangle {
    Rectangle::new()
        .set("x", x)
        .set("y", y)
        .set("width", w)
        .set("height", h)
        .set("fill", fill)
        .set("stroke", "#e5e7eb")
}

fn block(x: f64, y: f64, cell: Cell) -> Rectangle {
    let fill = cell_fill(cell.category, cell.intensity);
    let r = Rectangle::new()
        .set("x", x + 2.0)
        .set("y", y + 4.0)
        .set("width", CELL - 4.0)
        .set("height", CELL - 4.0)
        .set("fill", fill);
    if cell.dragging {
        r.set("opacity", 0.5)
    } else {
        r
    }
}

fn text(x: f64, y: f64, content: &str, size: f64, weight: &str) -> Text {
    Text::new()
        .set("x", x)
        .set("y", y)
        .set("font-family", FONT)
        .set("font-size", size)
        .set("font-weight", weight)
        .add(svg::node::Text::new(content))
}

fn centered(x: f64, y: f64, content: &str, size: f64) -> Text {
    text(x, y, content, size, "normal").set("text-anchor", "middle")
}

fn season_fill(season: SeasonName) -> &'static str {
    match season {
        SeasonName::Winter => "#eff6ff",
        SeasonName::Spring => "#f0fdf4",
        SeasonName::Summer => "#fefce8",
        SeasonName::Autumn => "#fff7ed",
    }
}

fn cell_fill(category: Category, intensity: Intensity) -> &'static str {
    use Category::*;
    use Intensity::*;
    match (category, intensity) {
        (Blue, Heavy) => "#2563eb",
        (Blue, Medium) => "#60a5fa",
        (Blue, Light) => "#bfdbfe",
        (Orange, Heavy) => "#ea580c",
        (Orange, Medium) => "#fb923c",
        (Orange, Light) => "#fed7aa",
        (Green, Heavy) => "#16a34a",
        (Green, Medium) => "#4ade80",
        (Green, Light) => "#bbf7d0",
        (Red, Heavy) => "#dc2626",
        (Red, Medium) => "#f87171",
        (Red, Light) => "#fecaca",
        (Purple, Heavy) => "#9333ea",
        (Purple, Medium) => "#c084fc",
        (Purple, Light) => "#e9d5ff",
    }
}
