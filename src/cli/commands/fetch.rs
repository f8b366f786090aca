use anyhow::Result;

use super::{
    super::{
        args::{DocumentArgs, FetchCommand, GlobalArgs},
        exit_status::ExitStatus,
        report,
    },
    helper::{file_host, orchestrator, print_json, runtime},
};

pub fn fetch(global: &GlobalArgs, cmd: FetchCommand) -> Result<ExitStatus> {
    let host = file_host(global, None, &DocumentArgs::default())?;
    let mut orchestrator = orchestrator(global, host)?;
    let report = runtime()?.block_on(orchestrator.fetch_keys())?;

    if cmd.json {
        print_json(&report)?;
    } else {
        report::print_fetch_report(&report);
    }

    Ok(if report.is_degraded() {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    })
}
