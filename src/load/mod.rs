pub mod error;
pub mod parse;

use crate::lib::{calendar::Calendar, schedule::Program};

/// Program used when none is given on the command line
pub const BUILTIN: &str = include_str!("../../data/turf.prog");
const BUILTIN_NAME: &str = "<builtin>";

/// Load the program in `filename`, or the builtin one
///
/// `None` is returned only when the program is unusable; warnings are
/// left in `errs` either way.
pub fn read_program(
    filename: Option<&str>,
    calendar: &Calendar,
    errs: &mut error::Record,
) -> Option<Program> {
    let (name, contents) = match filename {
        None => (BUILTIN_NAME, BUILTIN.to_string()),
        Some(filename) => match std::fs::read_to_string(filename) {
            Ok(contents) => (filename, contents),
            Err(e) => {
                errs.make("File not found")
                    .text(format!("Program file loaded is '{}'", filename))
                    .text(e)
                    .hint("check the path or omit it to use the builtin program");
                return None;
            }
        },
    };
    let program = parse::extract(name, errs, &contents, calendar);
    if errs.is_fatal() {
        return None;
    }
    log::info!(
        "Loaded {}: {} sections, {} items, {} periods, {} warnings",
        name,
        program.sections.len(),
        program.item_count(),
        program.periods().count(),
        errs.count_warnings(),
    );
    Some(program)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::{calendar::Hemisphere, date::Month};

    #[test]
    fn builtin_program() {
        let cal = Calendar::rolling(2025, Month::Jul, Hemisphere::Southern);
        let mut errs = error::Record::new();
        let program = read_program(None, &cal, &mut errs).unwrap();
        assert!(errs.is_empty(), "{}", errs);
        assert_eq!(program.sections.len(), 10);
        assert_eq!(program.item_count(), 22);
        assert_eq!(program.periods().count(), 158);
        assert_eq!(program.sections[0].title, "");
        assert_eq!(program.sections[1].title, "BASE - NUTRITION:");
        assert_eq!(program.sections[1].subtitle.as_deref(), Some("Fields: All"));
        let mut ids = program.periods().map(|p| p.id.0).collect::<Vec<_>>();
        ids.sort_unstable();
        assert_eq!(ids, (0..158).collect::<Vec<_>>());
    }

    #[test]
    fn missing_file() {
        let cal = Calendar::rolling(2025, Month::Jul, Hemisphere::Southern);
        let mut errs = error::Record::new();
        assert!(read_program(Some("does/not/exist.prog"), &cal, &mut errs).is_none());
        assert!(errs.is_fatal());
    }
}
