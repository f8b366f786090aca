//! Fetch and push orchestration.
//!
//! - `orchestrator`: owns settings, key index and text units; runs fetch and push
//! - `push`: grouping operator edits and planning per-language file writes
//! - `messages`: request/event message passing on top of the orchestrator

pub mod messages;
pub mod orchestrator;
pub mod push;

pub use messages::{Event, Request};
pub use orchestrator::{
    FetchReport, FetchState, FetchStatus, LanguageFetch, PUSHED_NOTICE, PushOptions, PushReport,
    PushState, SyncOrchestrator, SyncStatus, UP_TO_DATE_NOTICE,
};
pub use push::{FilePlan, KeyEdit, PushPlan};
