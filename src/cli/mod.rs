//! Command-line interface layer.
//!
//! Each command builds what it needs (a host over local files, an
//! orchestrator connected to GitHub) and prints a report.

use anyhow::Result;

mod args;
mod commands;
mod exit_status;
mod logging;
pub mod report;

pub use args::{Arguments, Command, GlobalArgs};
pub use exit_status::ExitStatus;
pub use logging::init_tracing;

use commands::{
    extract::extract, fetch::fetch, init::init, push::push, search::search, serve::serve,
};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(Arguments { global, command }) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    match command {
        Some(Command::Init) => init(&global),
        Some(Command::Extract(cmd)) => extract(&global, cmd),
        Some(Command::Fetch(cmd)) => fetch(&global, cmd),
        Some(Command::Search(cmd)) => search(&global, cmd),
        Some(Command::Push(cmd)) => push(&global, cmd),
        Some(Command::Serve(cmd)) => serve(&global, cmd),
        None => Ok(ExitStatus::Success),
    }
}
