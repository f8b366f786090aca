//! Host collaborator: the design tool that owns the document and persists
//! settings on the orchestrator's behalf.
//!
//! `FileHost` works on a JSON export of a design document and a settings file.
//! `MemoryHost` keeps everything in memory and records notifications.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::{
    config::{SyncSettings, read_settings_file, write_settings_file},
    core::{Node, find_node, find_node_mut},
};

pub trait Host: Send + Sync {
    /// Node forest of the current selection. Empty when nothing is selected.
    fn selection(&self) -> Result<Vec<Node>>;

    /// Previously persisted settings, if any.
    fn load_settings(&self) -> Result<Option<SyncSettings>>;

    fn persist_settings(&self, settings: &SyncSettings) -> Result<()>;

    fn rename_node(&self, id: &str, name: &str) -> Result<()>;

    /// Show a short message to the operator.
    fn notify(&self, message: &str) -> Result<()>;
}

/// A document export is either a single root node or a list of roots.
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum DocumentFile {
    Forest(Vec<Node>),
    Root(Node),
}

impl DocumentFile {
    fn roots(&self) -> &[Node] {
        match self {
            DocumentFile::Forest(roots) => roots,
            DocumentFile::Root(root) => std::slice::from_ref(root),
        }
    }

    fn roots_mut(&mut self) -> &mut [Node] {
        match self {
            DocumentFile::Forest(roots) => roots,
            DocumentFile::Root(root) => std::slice::from_mut(root),
        }
    }
}

pub fn read_document(path: &Path) -> Result<Vec<Node>> {
    Ok(load_document(path)?.roots().to_vec())
}

fn load_document(path: &Path) -> Result<DocumentFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse document: {}", path.display()))
}

/// Host backed by files on disk.
#[derive(Debug, Clone)]
pub struct FileHost {
    document: Option<PathBuf>,
    selection: Vec<String>,
    settings_path: PathBuf,
}

impl FileHost {
    pub fn new(settings_path: PathBuf) -> Self {
        Self {
            document: None,
            selection: Vec::new(),
            settings_path,
        }
    }

    pub fn with_document(mut self, document: PathBuf) -> Self {
        self.document = Some(document);
        self
    }

    /// Restrict the selection to these node ids. Empty selects every root.
    pub fn with_selection(mut self, ids: Vec<String>) -> Self {
        self.selection = ids;
        self
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }
}

impl Host for FileHost {
    fn selection(&self) -> Result<Vec<Node>> {
        let Some(path) = &self.document else {
            return Ok(Vec::new());
        };
        let document = load_document(path)?;
        if self.selection.is_empty() {
            return Ok(document.roots().to_vec());
        }
        self.selection
            .iter()
            .map(|id| {
                find_node(document.roots(), id)
                    .cloned()
                    .ok_or_else(|| anyhow!("Node '{}' not found in {}", id, path.display()))
            })
            .collect()
    }

    fn load_settings(&self) -> Result<Option<SyncSettings>> {
        if !self.settings_path.exists() {
            return Ok(None);
        }
        read_settings_file(&self.settings_path).map(Some)
    }

    fn persist_settings(&self, settings: &SyncSettings) -> Result<()> {
        write_settings_file(&self.settings_path, settings)
    }

    fn rename_node(&self, id: &str, name: &str) -> Result<()> {
        let path = self
            .document
            .as_deref()
            .ok_or_else(|| anyhow!("No document to rename nodes in"))?;
        let mut document = load_document(path)?;
        let node = find_node_mut(document.roots_mut(), id)
            .ok_or_else(|| anyhow!("Node '{}' not found in {}", id, path.display()))?;
        if node.name == name {
            return Ok(());
        }
        node.name = name.to_string();

        let mut content =
            serde_json::to_string_pretty(&document).context("Failed to serialize document")?;
        content.push('\n');
        fs::write(path, content)
            .with_context(|| format!("Failed to write document: {}", path.display()))
    }

    fn notify(&self, message: &str) -> Result<()> {
        eprintln!("{} {}", "note:".cyan().bold(), message);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryHostState {
    roots: Vec<Node>,
    settings: Option<SyncSettings>,
    notifications: Vec<String>,
}

/// In-memory host. Clones share state, so a caller can keep a handle after
/// giving one to the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    state: Arc<Mutex<MemoryHostState>>,
}

impl MemoryHost {
    pub fn new(roots: Vec<Node>) -> Self {
        let host = Self::default();
        host.select(roots);
        host
    }

    pub fn with_settings(self, settings: SyncSettings) -> Self {
        self.state().settings = Some(settings);
        self
    }

    fn state(&self) -> MutexGuard<'_, MemoryHostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the current selection.
    pub fn select(&self, roots: Vec<Node>) {
        self.state().roots = roots;
    }

    pub fn settings(&self) -> Option<SyncSettings> {
        self.state().settings.clone()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.state().notifications.clone()
    }

    pub fn node_name(&self, id: &str) -> Option<String> {
        find_node(&self.state().roots, id).map(|node| node.name.clone())
    }
}

impl Host for MemoryHost {
    fn selection(&self) -> Result<Vec<Node>> {
        Ok(self.state().roots.clone())
    }

    fn load_settings(&self) -> Result<Option<SyncSettings>> {
        Ok(self.settings())
    }

    fn persist_settings(&self, settings: &SyncSettings) -> Result<()> {
        self.state().settings = Some(settings.clone());
        Ok(())
    }

    fn rename_node(&self, id: &str, name: &str) -> Result<()> {
        let mut state = self.state();
        let node = find_node_mut(&mut state.roots, id)
            .ok_or_else(|| anyhow!("Node '{}' not found", id))?;
        node.name = name.to_string();
        Ok(())
    }

    fn notify(&self, message: &str) -> Result<()> {
        self.state().notifications.push(message.to_string());
        Ok(())
    }
}
