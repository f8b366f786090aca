//! The sync orchestrator owns the settings, the key index and the last
//! extracted text units, and composes fetch and push from the remote store.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use super::push::{KeyEdit, PushPlan, default_edits, group_edits, plan_files};
use crate::{
    config::{LanguageCode, SyncSettings},
    core::{KeyIndex, KeyMatch, TextUnit, TranslationTable, extract_text_units, parse_table},
    error::SyncError,
    host::Host,
    remote::{CommitTransaction, Connector, FileChange, RemoteStore},
};

pub const PUSHED_NOTICE: &str = "Translations pushed to GitHub!";
pub const UP_TO_DATE_NOTICE: &str = "Translations already up to date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchState {
    Idle,
    Fetching,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PushState {
    Idle,
    Pushing,
    Pushed,
    Failed,
}

/// Outcome of fetching one language's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FetchStatus {
    Loaded { keys: usize },
    /// No file at the path yet.
    Missing,
    /// The file could not be decoded or parsed.
    Malformed { error: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageFetch {
    pub language: LanguageCode,
    pub path: String,
    #[serde(flatten)]
    pub status: FetchStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchReport {
    pub languages: Vec<LanguageFetch>,
    pub total_keys: usize,
}

impl FetchReport {
    /// True when some language fell back to an empty table because of an error.
    pub fn is_degraded(&self) -> bool {
        self.languages.iter().any(|l| {
            matches!(
                l.status,
                FetchStatus::Failed { .. } | FetchStatus::Malformed { .. }
            )
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushOptions {
    /// Rename pushed nodes to their key.
    pub rename_nodes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushReport {
    /// New branch tip, or `None` when nothing changed.
    pub revision: Option<String>,
    #[serde(flatten)]
    pub plan: PushPlan,
    pub renamed: usize,
}

/// Snapshot of the orchestrator for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub configured: bool,
    pub fetch: FetchState,
    pub push: PushState,
    pub keys_loaded: usize,
    pub text_units: usize,
}

pub struct SyncOrchestrator {
    host: Box<dyn Host>,
    connector: Box<dyn Connector>,
    settings: SyncSettings,
    /// Token override for this process; never persisted.
    session_token: Option<String>,
    index: KeyIndex,
    text_units: Vec<TextUnit>,
    fetch_state: FetchState,
    push_state: PushState,
}

fn host_error(err: anyhow::Error) -> SyncError {
    SyncError::Host(format!("{:#}", err))
}

impl SyncOrchestrator {
    pub fn new(host: Box<dyn Host>, connector: Box<dyn Connector>) -> Self {
        Self {
            host,
            connector,
            settings: SyncSettings::default(),
            session_token: None,
            index: KeyIndex::new(),
            text_units: Vec::new(),
            fetch_state: FetchState::Idle,
            push_state: PushState::Idle,
        }
    }

    /// Load persisted settings through the host, falling back to defaults.
    pub fn load_settings(&mut self) -> Result<&SyncSettings, SyncError> {
        self.settings = self.host.load_settings().map_err(host_error)?.unwrap_or_default();
        Ok(&self.settings)
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Validate, persist and replace the settings wholesale.
    ///
    /// The key index is kept; call [`SyncOrchestrator::invalidate_index`] when
    /// the connection changed.
    pub fn save_settings(&mut self, settings: SyncSettings) -> Result<(), SyncError> {
        settings.validate()?;
        self.host.persist_settings(&settings).map_err(host_error)?;
        info!(repo = %settings.repo, branch = %settings.branch, "Settings saved");
        self.settings = settings;
        Ok(())
    }

    /// Use a token for this session without persisting it.
    pub fn set_token(&mut self, token: &str) {
        let token = token.trim();
        self.session_token = (!token.is_empty()).then(|| token.to_string());
    }

    /// Settings used to connect: the persisted ones with the session token applied.
    fn connection_settings(&self) -> SyncSettings {
        let mut settings = self.settings.clone();
        if let Some(token) = &self.session_token {
            settings.token = token.clone();
        }
        settings
    }

    pub fn invalidate_index(&mut self) {
        self.index.clear();
        self.fetch_state = FetchState::Idle;
    }

    pub fn index(&self) -> &KeyIndex {
        &self.index
    }

    /// Re-extract text units from the host's current selection.
    pub fn refresh_selection(&mut self) -> Result<&[TextUnit], SyncError> {
        let roots = self.host.selection().map_err(host_error)?;
        self.text_units = extract_text_units(&roots);
        Ok(&self.text_units)
    }

    pub fn text_units(&self) -> &[TextUnit] {
        &self.text_units
    }

    /// Starting edits for the current text units, seeded with the source language.
    pub fn default_edits(&self) -> Vec<KeyEdit> {
        match self.settings.source_language() {
            Some(source) => default_edits(&self.text_units, &source),
            None => Vec::new(),
        }
    }

    pub fn notify(&self, message: &str) -> Result<(), SyncError> {
        self.host.notify(message).map_err(host_error)
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            configured: self.connection_settings().is_configured(),
            fetch: self.fetch_state,
            push: self.push_state,
            keys_loaded: self.index.len(),
            text_units: self.text_units.len(),
        }
    }

    pub fn fetch_state(&self) -> FetchState {
        self.fetch_state
    }

    pub fn push_state(&self) -> PushState {
        self.push_state
    }

    /// Search the loaded index across the configured languages. Never fetches.
    pub fn search(&self, query: &str) -> Vec<KeyMatch> {
        self.index.search(query, &self.settings.languages())
    }

    /// Fetch every language's table and rebuild the index from them.
    ///
    /// Missing files count as empty tables. Other per-language failures are
    /// reported and degrade that language to an empty table; credential
    /// failures abort the fetch and leave the index as it was.
    pub async fn fetch_keys(&mut self) -> Result<FetchReport, SyncError> {
        let connection = self.connection_settings();
        connection.ensure_configured()?;
        let store = self.connector.connect(&connection)?;

        self.fetch_state = FetchState::Fetching;
        match fetch_tables(store.as_ref(), &self.settings).await {
            Ok((tables, languages)) => {
                self.index = KeyIndex::from_tables(tables.iter().map(|(l, t)| (l, t)));
                self.fetch_state = FetchState::Loaded;
                let report = FetchReport {
                    languages,
                    total_keys: self.index.len(),
                };
                info!(
                    keys = report.total_keys,
                    degraded = report.is_degraded(),
                    "Keys loaded"
                );
                Ok(report)
            }
            Err(err) => {
                self.fetch_state = FetchState::Failed;
                warn!(error = %err, "Fetch aborted");
                Err(err)
            }
        }
    }

    /// Compute what a push would write without committing.
    pub async fn plan_push(&self, edits: &[KeyEdit]) -> Result<PushPlan, SyncError> {
        let connection = self.connection_settings();
        connection.ensure_configured()?;
        let grouped = group_edits(edits, &self.settings.languages());
        if grouped.is_empty() {
            return Err(SyncError::Invalid("no translations to push".to_string()));
        }
        let store = self.connector.connect(&connection)?;
        let transaction = CommitTransaction::begin(store.as_ref(), &self.settings.branch).await?;
        plan_files(&transaction, &self.settings, &grouped).await
    }

    /// Merge the edits into each language's remote file and commit all changed
    /// files as one revision.
    pub async fn push(
        &mut self,
        edits: &[KeyEdit],
        options: PushOptions,
    ) -> Result<PushReport, SyncError> {
        let connection = self.connection_settings();
        connection.ensure_configured()?;
        let grouped = group_edits(edits, &self.settings.languages());
        if grouped.is_empty() {
            return Err(SyncError::Invalid("no translations to push".to_string()));
        }
        let store = self.connector.connect(&connection)?;

        self.push_state = PushState::Pushing;
        let (revision, plan) = match commit_push(store.as_ref(), &self.settings, &grouped).await {
            Ok(result) => result,
            Err(err) => {
                self.push_state = PushState::Failed;
                warn!(error = %err, "Push failed");
                return Err(err);
            }
        };
        self.push_state = PushState::Pushed;

        for (language, table) in &grouped {
            self.index.merge_table(language, table);
        }

        let renamed = if options.rename_nodes {
            self.rename_pushed_nodes(edits)
        } else {
            0
        };

        let notice = if revision.is_some() {
            PUSHED_NOTICE
        } else {
            UP_TO_DATE_NOTICE
        };
        if let Err(err) = self.host.notify(notice) {
            warn!(error = %format!("{:#}", err), "Host notification failed");
        }

        Ok(PushReport {
            revision,
            plan,
            renamed,
        })
    }

    /// Rename nodes to the key pushed for them. Failures are logged, not fatal:
    /// the commit has already landed.
    fn rename_pushed_nodes(&self, edits: &[KeyEdit]) -> usize {
        let mut renamed = 0;
        for edit in edits {
            let key = edit.key.trim();
            let Some(node_id) = &edit.node_id else {
                continue;
            };
            if key.is_empty() || edit.values.values().all(|v| v.trim().is_empty()) {
                continue;
            }
            match self.host.rename_node(node_id, key) {
                Ok(()) => renamed += 1,
                Err(err) => warn!(%node_id, key, error = %format!("{:#}", err), "Rename failed"),
            }
        }
        renamed
    }
}

async fn fetch_tables(
    store: &dyn RemoteStore,
    settings: &SyncSettings,
) -> Result<(Vec<(LanguageCode, TranslationTable)>, Vec<LanguageFetch>), SyncError> {
    let mut tables = Vec::new();
    let mut report = Vec::new();

    for language in settings.languages() {
        let path = settings.file_path(&language);
        let (table, status) = match store.get_file(&path, &settings.branch).await {
            Ok(Some(file)) => match parse_table(&file.content, &path) {
                Ok(table) => {
                    let keys = table.len();
                    (table, FetchStatus::Loaded { keys })
                }
                Err(err) => {
                    warn!(%language, %path, error = %err, "Unparsable table, using empty table");
                    (
                        TranslationTable::new(),
                        FetchStatus::Malformed {
                            error: err.to_string(),
                        },
                    )
                }
            },
            Ok(None) => (TranslationTable::new(), FetchStatus::Missing),
            Err(err) if err.is_auth() => return Err(err),
            Err(err @ SyncError::MalformedContent { .. }) => {
                warn!(%language, %path, error = %err, "Undecodable file, using empty table");
                (
                    TranslationTable::new(),
                    FetchStatus::Malformed {
                        error: err.to_string(),
                    },
                )
            }
            Err(err) => {
                warn!(%language, %path, error = %err, "Fetch failed, using empty table");
                (
                    TranslationTable::new(),
                    FetchStatus::Failed {
                        error: err.to_string(),
                    },
                )
            }
        };

        tables.push((language.clone(), table));
        report.push(LanguageFetch {
            language,
            path,
            status,
        });
    }

    Ok((tables, report))
}

async fn commit_push(
    store: &dyn RemoteStore,
    settings: &SyncSettings,
    grouped: &IndexMap<LanguageCode, TranslationTable>,
) -> Result<(Option<String>, PushPlan), SyncError> {
    let mut transaction = CommitTransaction::begin(store, &settings.branch).await?;
    let plan = plan_files(&transaction, settings, grouped).await?;

    if plan.is_noop() {
        info!(branch = %settings.branch, "Nothing changed, no commit made");
        return Ok((None, plan));
    }

    for file in plan.changed_files() {
        transaction.stage(FileChange::new(file.path.clone(), file.content.clone()));
    }
    let revision = transaction.commit(&plan.message).await?;
    Ok((Some(revision), plan))
}
