//! Everything that talks to the user: arguments, terminal grid,
//! SVG sheet and the command loop

pub mod color;
pub mod config;
pub mod repl;
pub mod sheet;
pub mod table;
