use anyhow::Result;

use super::{
    super::{
        args::{GlobalArgs, ServeCommand},
        exit_status::ExitStatus,
    },
    helper::{file_host, orchestrator},
};
use crate::mcp::run_server;

pub fn serve(global: &GlobalArgs, cmd: ServeCommand) -> Result<ExitStatus> {
    let host = file_host(global, cmd.document, &cmd.selection)?;
    run_server(orchestrator(global, host)?)?;
    Ok(ExitStatus::Success)
}
