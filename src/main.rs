use std::process::ExitCode;

use clap::Parser;
use glot_sync::cli::{Arguments, ExitStatus, init_tracing};

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_tracing(args.global.verbose);

    match glot_sync::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}
