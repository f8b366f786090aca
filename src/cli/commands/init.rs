use std::{env, fs};

use anyhow::Result;
use colored::Colorize;

use super::super::{args::GlobalArgs, exit_status::ExitStatus, report::SUCCESS_MARK};
use crate::config::{CONFIG_FILE_NAME, default_settings_json};

pub fn init(global: &GlobalArgs) -> Result<ExitStatus> {
    let config_path = match &global.settings {
        Some(path) => path.clone(),
        None => env::current_dir()?.join(CONFIG_FILE_NAME),
    };

    if config_path.exists() {
        eprintln!("Error: {} already exists", config_path.display());
        return Ok(ExitStatus::Failure);
    }

    let mut content = default_settings_json()?;
    content.push('\n');
    fs::write(&config_path, content)?;
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", CONFIG_FILE_NAME).green()
    );

    Ok(ExitStatus::Success)
}
