//! The schedule store and the drag-and-drop gesture around it
//!
//! A `Board` is the one owner of the current program. Everything runs on a
//! single thread of events: a gesture is `drag_start`, any number of
//! `drag_over`/`drag_leave`, then either `drop` or `drag_end`. Only `drop`
//! writes, so a gesture that never drops leaves the program as it was.

use crate::lib::{
    calendar::Calendar,
    date::Month,
    schedule::{self, Category, Intensity, Location, PeriodId, Program},
};

/// The period currently being dragged and where it lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub id: PeriodId,
    pub loc: Location,
}

/// The cell currently hovered during a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub month: Month,
    pub week: u8,
}

/// What a grid cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub id: PeriodId,
    pub category: Category,
    pub intensity: Intensity,
    /// the cell belongs to the period being dragged
    pub dragging: bool,
}

#[derive(Debug)]
pub struct Board {
    calendar: Calendar,
    program: Program,
    drag: Option<DragState>,
    target: Option<DropTarget>,
}

impl Board {
    /// Take ownership of a program, fitting every period to the calendar
    pub fn new(calendar: Calendar, program: Program) -> Self {
        let program = program.clamped(&calendar);
        Self {
            calendar,
            program,
            drag: None,
            target: None,
        }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Current snapshot
    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn dragging(&self) -> Option<DragState> {
        self.drag
    }

    pub fn drop_target(&self) -> Option<DropTarget> {
        self.target
    }

    /// Pick up period `id`; returns `false` if no item owns it
    pub fn drag_start(&mut self, id: PeriodId) -> bool {
        match self.program.locate(id) {
            Some(loc) => {
                log::debug!("Drag {} from section {} item {}", id, loc.section, loc.item);
                self.drag = Some(DragState { id, loc });
                self.target = None;
                true
            }
            None => {
                log::warn!("No period {} to drag", id);
                false
            }
        }
    }

    /// Hover over a cell while dragging
    pub fn drag_over(&mut self, month: Month, week: u8) {
        if self.drag.is_some() {
            log::debug!("Drag over {} week {}", month, week);
            self.target = Some(DropTarget { month, week });
        }
    }

    pub fn drag_leave(&mut self) {
        if self.target.take().is_some() {
            log::debug!("Drag left the grid");
        }
    }

    /// Abandon the gesture without changing anything
    pub fn drag_end(&mut self) {
        if let Some(drag) = self.drag.take() {
            log::debug!("Drag of {} cancelled", drag.id);
        }
        self.target = None;
    }

    /// Release the dragged period on a cell
    ///
    /// Returns whether the program changed. The gesture is over either way.
    pub fn drop(&mut self, month: Month, week: u8) -> bool {
        self.target = None;
        let drag = match self.drag.take() {
            Some(drag) => drag,
            None => return false,
        };
        let weeks = self.calendar.weeks(month);
        let moved = self
            .program
            .item(drag.loc)
            .and_then(|item| schedule::move_period(item, drag.id, month, week, weeks));
        match moved {
            Some(item) => {
                log::info!("Moved {} to {} week {}", drag.id, month, week);
                self.program = self.program.with_item(drag.loc, item);
                true
            }
            None => {
                log::warn!(
                    "Rejected drop of {} on {} week {} ({} has {} weeks)",
                    drag.id,
                    month,
                    week,
                    month,
                    self.calendar.weeks(month),
                );
                false
            }
        }
    }

    /// A complete gesture: pick up `id` and drop it on `week` of `month`
    pub fn move_period(&mut self, id: PeriodId, month: Month, week: u8) -> bool {
        self.drag_start(id) && self.drop(month, week)
    }

    /// Contents of the cell at `week` of `month` on the row of item `loc`
    pub fn cell(&self, loc: Location, month: Month, week: u8) -> Option<Cell> {
        let item = self.program.item(loc)?;
        let (period, position) = item.period_at(month, week)?;
        Some(Cell {
            id: period.id,
            category: period.category,
            intensity: Intensity::at(position),
            dragging: self.drag.map(|d| d.id == period.id).unwrap_or(false),
        })
    }

    /// Whether the cell is the hovered drop target
    pub fn is_target(&self, month: Month, week: u8) -> bool {
        self.drop_target() == Some(DropTarget { month, week })
    }
}
