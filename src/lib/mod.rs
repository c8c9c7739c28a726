//! Implementations that are useful accross the whole project
//!
//! Calendar geometry, the schedule model and the store that edits it

pub mod board;
pub mod calendar;
pub mod date;
pub mod schedule;
