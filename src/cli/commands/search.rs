use anyhow::Result;

use super::{
    super::{
        args::{DocumentArgs, GlobalArgs, SearchCommand},
        exit_status::ExitStatus,
        report,
    },
    helper::{file_host, orchestrator, print_json, runtime},
};

/// Fetch the published keys, then search them.
pub fn search(global: &GlobalArgs, cmd: SearchCommand) -> Result<ExitStatus> {
    let host = file_host(global, None, &DocumentArgs::default())?;
    let mut orchestrator = orchestrator(global, host)?;
    let fetched = runtime()?.block_on(orchestrator.fetch_keys())?;
    let matches = orchestrator.search(&cmd.query);

    if cmd.json {
        print_json(&matches)?;
    } else {
        report::print_search_results(&cmd.query, &matches, &orchestrator.settings().languages());
    }

    Ok(if fetched.is_degraded() {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    })
}
