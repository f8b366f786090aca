//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes the orchestrator's requests as MCP tools over stdio. Each tool
//! sends one request and returns the resulting events as JSON.
//!
//! ## Module Structure
//!
//! - `server`: tool router and server handler
//! - `types`: tool parameter types

mod server;
pub mod types;

pub use server::{GlotSyncMcpServer, run_server};
