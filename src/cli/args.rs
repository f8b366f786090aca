//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `init`: Write a default settings file
//! - `extract`: List translatable text of a design document export
//! - `fetch`: Load published keys from the repository
//! - `search`: Find published keys by key or translated text
//! - `push`: Merge translations into the repository as one commit
//! - `serve`: Start MCP server for AI integration

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

/// Options accepted by every command.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Settings file (default: nearest .glot-sync.json)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// GitHub token (overrides the settings file)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Where the design text comes from.
#[derive(Debug, Clone, Default, Args)]
pub struct DocumentArgs {
    /// Only use these node ids as the selection (repeatable)
    #[arg(long = "node", value_name = "ID")]
    pub nodes: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// JSON export of the design document
    pub document: PathBuf,

    #[command(flatten)]
    pub selection: DocumentArgs,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct FetchCommand {
    /// Print JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Text to look for in keys and translations
    pub query: String,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PushCommand {
    /// JSON export of the design document; its text is pushed in the source language
    #[arg(long)]
    pub document: Option<PathBuf>,

    #[command(flatten)]
    pub selection: DocumentArgs,

    /// JSON file with edits: [{"key": "...", "values": {"en_US": "..."}}]
    #[arg(long)]
    pub edits: Option<PathBuf>,

    /// Show the merged files without committing
    #[arg(long)]
    pub dry_run: bool,

    /// Rename pushed layers in the document to their key
    #[arg(long)]
    pub rename_layers: bool,

    /// Print JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ServeCommand {
    /// JSON export of the design document used as the selection
    #[arg(long)]
    pub document: Option<PathBuf>,

    #[command(flatten)]
    pub selection: DocumentArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize a new .glot-sync.json settings file
    Init,
    /// List translatable text and suggested keys of a design document
    Extract(ExtractCommand),
    /// Fetch published keys for every configured language
    Fetch(FetchCommand),
    /// Search published keys by key or translated text
    Search(SearchCommand),
    /// Merge translations into the repository as a single commit
    Push(PushCommand),
    /// Start MCP server for AI coding agents
    Serve(ServeCommand),
}
