//! Explicit request/event messages between a presentation layer and the
//! orchestrator.
//!
//! Every inbound [`Request`] is answered with the outbound [`Event`]s it
//! produced. Failures become an `operation-failed` event instead of an error,
//! so a front end can render them like any other event.

use serde::{Deserialize, Serialize};

use super::{
    orchestrator::{FetchReport, PushOptions, PushReport, SyncOrchestrator, SyncStatus},
    push::{KeyEdit, PushPlan},
};
use crate::{
    config::SyncSettings,
    core::{KeyMatch, TextUnit},
    error::SyncError,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Request {
    GetSelection,
    /// The host reports that its selection changed.
    SelectionChanged,
    LoadSettings,
    SaveSettings {
        settings: SyncSettings,
    },
    FetchKeys,
    /// Drop the loaded keys, e.g. after the connection changed.
    InvalidateKeys,
    SearchKeys {
        query: String,
    },
    Push {
        edits: Vec<KeyEdit>,
        #[serde(default)]
        dry_run: bool,
        #[serde(default)]
        rename_nodes: bool,
    },
    Notify {
        message: String,
    },
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::GetSelection => "get-selection",
            Request::SelectionChanged => "selection-changed",
            Request::LoadSettings => "load-settings",
            Request::SaveSettings { .. } => "save-settings",
            Request::FetchKeys => "fetch-keys",
            Request::InvalidateKeys => "invalidate-keys",
            Request::SearchKeys { .. } => "search-keys",
            Request::Push { .. } => "push",
            Request::Notify { .. } => "notify",
        }
    }
}

/// Outbound notifications. Settings are always sent with the token redacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Event {
    SelectionResult {
        units: Vec<TextUnit>,
        edits: Vec<KeyEdit>,
    },
    SelectionChanged {
        units: Vec<TextUnit>,
    },
    SettingsLoaded {
        settings: SyncSettings,
    },
    SettingsSaved {
        settings: SyncSettings,
    },
    KeysLoaded {
        #[serde(skip_serializing_if = "Option::is_none")]
        report: Option<FetchReport>,
        status: SyncStatus,
    },
    SearchResult {
        query: String,
        matches: Vec<KeyMatch>,
    },
    PushPlanned {
        plan: PushPlan,
    },
    Pushed {
        report: PushReport,
    },
    OperationFailed {
        operation: String,
        error: String,
    },
}

impl SyncOrchestrator {
    /// Handle one request and return the events it produced.
    pub async fn handle(&mut self, request: Request) -> Vec<Event> {
        let operation = request.name();
        match self.dispatch(request).await {
            Ok(events) => events,
            Err(err) => vec![Event::OperationFailed {
                operation: operation.to_string(),
                error: err.to_string(),
            }],
        }
    }

    async fn dispatch(&mut self, request: Request) -> Result<Vec<Event>, SyncError> {
        let event = match request {
            Request::GetSelection => {
                let units = self.refresh_selection()?.to_vec();
                Event::SelectionResult {
                    units,
                    edits: self.default_edits(),
                }
            }
            Request::SelectionChanged => Event::SelectionChanged {
                units: self.refresh_selection()?.to_vec(),
            },
            Request::LoadSettings => Event::SettingsLoaded {
                settings: self.load_settings()?.redacted(),
            },
            Request::SaveSettings { settings } => {
                self.save_settings(settings)?;
                Event::SettingsSaved {
                    settings: self.settings().redacted(),
                }
            }
            Request::FetchKeys => {
                let report = self.fetch_keys().await?;
                Event::KeysLoaded {
                    report: Some(report),
                    status: self.status(),
                }
            }
            Request::InvalidateKeys => {
                self.invalidate_index();
                Event::KeysLoaded {
                    report: None,
                    status: self.status(),
                }
            }
            Request::SearchKeys { query } => Event::SearchResult {
                matches: self.search(&query),
                query,
            },
            Request::Push {
                edits,
                dry_run: true,
                ..
            } => Event::PushPlanned {
                plan: self.plan_push(&edits).await?,
            },
            Request::Push {
                edits,
                rename_nodes,
                ..
            } => Event::Pushed {
                report: self.push(&edits, PushOptions { rename_nodes }).await?,
            },
            Request::Notify { message } => {
                self.notify(&message)?;
                return Ok(Vec::new());
            }
        };
        Ok(vec![event])
    }
}
