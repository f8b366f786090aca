use anyhow::Result;

use super::{
    super::{
        args::{ExtractCommand, GlobalArgs},
        exit_status::ExitStatus,
        report,
    },
    helper::{file_host, print_json},
};
use crate::{core::extract_text_units, host::Host};

/// List the text units of a document export. Needs no settings or network.
pub fn extract(global: &GlobalArgs, cmd: ExtractCommand) -> Result<ExitStatus> {
    let host = file_host(global, Some(cmd.document), &cmd.selection)?;
    let units = extract_text_units(&host.selection()?);

    if cmd.json {
        print_json(&units)?;
    } else {
        report::print_text_units(&units);
    }

    Ok(ExitStatus::Success)
}
