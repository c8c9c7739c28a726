mod cli;
mod lib;
mod load;

use std::io;

use cli::{config::Config, repl::Session, sheet::Sheet, table::Grid};
use lib::{board::Board, calendar::Calendar};
use load::error::Record;

fn main() {
    env_logger::init();
    log::info!("turfplan {}", env!("CARGO_PKG_VERSION"));

    // flags are not validated yet, but their diagnostics follow --no-color too
    let mut errs = Record::new().with_color(!std::env::args().any(|a| a == "--no-color"));
    let config = match Config::from_args(&mut errs) {
        Some(config) => config,
        None => {
            eprintln!("{}", errs);
            std::process::exit(1);
        }
    };
    let calendar = Calendar::rolling(config.year, config.start, config.hemisphere);
    let program = load::read_program(config.program.as_deref(), &calendar, &mut errs);
    if !errs.is_empty() {
        eprintln!("{}", errs);
    }
    let program = match program {
        Some(program) => program,
        None => std::process::exit(1),
    };
    let board = Board::new(calendar, program);

    if let Some(file) = &config.print {
        if let Err(e) = Sheet::from(&board).save(file) {
            eprintln!("could not write {}: {}", file, e);
            std::process::exit(1);
        }
        return;
    }
    if config.batch {
        print!("{}", Grid::from(&board).with_color(config.color));
        return;
    }
    let stdin = io::stdin();
    let mut session = Session::new(board, config.color);
    if let Err(e) = session.run(stdin.lock(), io::stdout()) {
        log::error!("Command loop stopped: {}", e);
        std::process::exit(1);
    }
}
