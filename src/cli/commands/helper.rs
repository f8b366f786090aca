use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::runtime::Runtime;

use super::super::args::{DocumentArgs, GlobalArgs};
use crate::{
    config::{CONFIG_FILE_NAME, find_config_file},
    host::FileHost,
    remote::GitHubConnector,
    sync::SyncOrchestrator,
};

/// `--settings`, else the nearest settings file upwards, else one in the
/// current directory.
pub fn settings_path(global: &GlobalArgs) -> Result<PathBuf> {
    if let Some(path) = &global.settings {
        return Ok(path.clone());
    }
    let cwd = env::current_dir().context("Failed to read the current directory")?;
    Ok(find_config_file(&cwd).unwrap_or_else(|| cwd.join(CONFIG_FILE_NAME)))
}

pub fn file_host(
    global: &GlobalArgs,
    document: Option<PathBuf>,
    selection: &DocumentArgs,
) -> Result<FileHost> {
    let host = FileHost::new(settings_path(global)?).with_selection(selection.nodes.clone());
    Ok(match document {
        Some(document) => host.with_document(document),
        None => host,
    })
}

/// Orchestrator talking to GitHub with settings loaded from the host.
pub fn orchestrator(global: &GlobalArgs, host: FileHost) -> Result<SyncOrchestrator> {
    let mut orchestrator = SyncOrchestrator::new(Box::new(host), Box::new(GitHubConnector));
    orchestrator.load_settings()?;
    if let Some(token) = &global.token {
        orchestrator.set_token(token);
    }
    Ok(orchestrator)
}

pub fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
