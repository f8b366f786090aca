//! Glot Sync - publish design text as translation keys on GitHub
//!
//! Glot Sync extracts translatable text from a design document, suggests a
//! key for each piece, and merges translations into one YAML file per
//! language in a GitHub repository. A push writes every changed file in a
//! single commit, so the branch never holds a half-updated set of languages.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Sync settings and the settings file
//! - `core`: Key generation, text extraction, translation tables and the key index
//! - `error`: Error type shared by the remote store and the orchestrator
//! - `host`: The design tool the orchestrator works for
//! - `mcp`: Model Context Protocol server implementation
//! - `remote`: Remote store abstraction, GitHub client and atomic commits
//! - `sync`: Fetch and push orchestration and its request/event protocol

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod host;
pub mod mcp;
pub mod remote;
pub mod sync;
