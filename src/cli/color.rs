//! ANSI escapes for everything printed to the terminal

use std::fmt;

use crate::lib::schedule::Category;

pub const RED: &str = "\x1b[1;91m";
pub const YELLOW: &str = "\x1b[1;93m";
pub const CYAN: &str = "\x1b[1;96m";
pub const BOLD: &str = "\x1b[1m";
pub const REVERSE: &str = "\x1b[7m";
pub const DIM: &str = "\x1b[2m";
pub const RESET: &str = "\x1b[0m";

/// Foreground of the cells of a category
pub fn category(c: Category) -> &'static str {
    match c {
        Category::Blue => "\x1b[34m",
        Category::Orange => "\x1b[38;5;208m",
        Category::Green => "\x1b[32m",
        Category::Red => "\x1b[31m",
        Category::Purple => "\x1b[35m",
    }
}

/// Whether escapes are written at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint(bool);

impl Paint {
    pub const ON: Self = Self(true);
    pub const OFF: Self = Self(false);

    pub fn new(on: bool) -> Self {
        Self(on)
    }

    /// `text` between `style` and a reset, or bare when painting is off
    pub fn wrap<T>(self, style: &str, text: T) -> String
    where
        T: fmt::Display,
    {
        if self.0 && !style.is_empty() {
            format!("{}{}{}", style, text, RESET)
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn wrapping() {
        assert_eq!(Paint::ON.wrap(RED, "error"), "\x1b[1;91merror\x1b[0m");
        assert_eq!(Paint::OFF.wrap(RED, "error"), "error");
        assert_eq!(Paint::ON.wrap("", 12), "12");
        assert_eq!(Paint::new(true), Paint::ON);
    }
}
