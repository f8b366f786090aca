use std::{fs, io, path::Path};

use anyhow::{Context, Result, bail};

use super::{
    super::{
        args::{GlobalArgs, PushCommand},
        exit_status::ExitStatus,
        report,
    },
    helper::{file_host, orchestrator, print_json, runtime},
};
use crate::sync::{KeyEdit, PushOptions};

fn read_edits(path: &Path) -> Result<Vec<KeyEdit>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read edits file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse edits file: {}", path.display()))
}

/// Push an edits file, or the document's text under its suggested keys.
pub fn push(global: &GlobalArgs, cmd: PushCommand) -> Result<ExitStatus> {
    if cmd.edits.is_none() && cmd.document.is_none() {
        bail!("Nothing to push: pass --edits or --document");
    }
    if cmd.rename_layers && cmd.document.is_none() {
        bail!("--rename-layers needs --document");
    }

    let host = file_host(global, cmd.document.clone(), &cmd.selection)?;
    let mut orchestrator = orchestrator(global, host)?;

    let edits = match &cmd.edits {
        Some(path) => read_edits(path)?,
        None => {
            orchestrator.refresh_selection()?;
            orchestrator.default_edits()
        }
    };

    let runtime = runtime()?;

    if cmd.dry_run {
        let plan = runtime.block_on(orchestrator.plan_push(&edits))?;
        if cmd.json {
            print_json(&plan)?;
        } else {
            report::print_push_plan(&plan, true);
            report::print_dry_run_notice_to(&plan, &mut io::stdout().lock());
        }
        return Ok(ExitStatus::Success);
    }

    let options = PushOptions {
        rename_nodes: cmd.rename_layers,
    };
    let pushed = runtime.block_on(orchestrator.push(&edits, options))?;
    if cmd.json {
        print_json(&pushed)?;
    } else {
        report::print_push_report(&pushed);
    }

    Ok(ExitStatus::Success)
}
