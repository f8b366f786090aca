//! In-process git-like object store.
//!
//! Blobs, trees and revisions are content-addressed with SHA-256 and never
//! mutated; branches are the only mutable state. Branch updates must be
//! fast-forwards, like the conditional ref update of the real remote.
//!
//! Failures can be injected per commit step or per file path to exercise the
//! orchestrator's error handling.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::{CommitStep, Connector, RemoteFile, RemoteStore, TreeEntry};
use crate::{config::SyncSettings, error::SyncError};

type Tree = BTreeMap<String, String>;

#[derive(Debug, Clone)]
struct Revision {
    tree: String,
    parents: Vec<String>,
    message: String,
}

#[derive(Debug, Default)]
struct State {
    blobs: HashMap<String, String>,
    trees: HashMap<String, Tree>,
    revisions: HashMap<String, Revision>,
    branches: HashMap<String, String>,
    /// One-shot failures, consumed by the next call of that step.
    step_failures: HashMap<CommitStep, SyncError>,
    /// Persistent read failures by path.
    read_failures: HashMap<String, SyncError>,
    calls: HashMap<CommitStep, usize>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

fn content_id(kind: &str, parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    for part in parts {
        hasher.update([0u8]);
        hasher.update(part.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

impl State {
    fn enter(&mut self, step: CommitStep) -> Result<(), SyncError> {
        *self.calls.entry(step).or_default() += 1;
        match self.step_failures.remove(&step) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn resolve(&self, reference: &str) -> Option<&String> {
        self.branches
            .get(reference)
            .or_else(|| self.revisions.get_key_value(reference).map(|(id, _)| id))
    }

    fn put_blob(&mut self, content: &str) -> String {
        let id = content_id("blob", &[content]);
        self.blobs.insert(id.clone(), content.to_string());
        id
    }

    fn put_tree(&mut self, tree: Tree) -> String {
        let flat: Vec<&str> = tree
            .iter()
            .flat_map(|(path, blob)| [path.as_str(), blob.as_str()])
            .collect();
        let id = content_id("tree", &flat);
        self.trees.insert(id.clone(), tree);
        id
    }

    fn put_revision(&mut self, revision: Revision) -> String {
        let mut parts = vec![revision.tree.as_str(), revision.message.as_str()];
        parts.extend(revision.parents.iter().map(String::as_str));
        let id = content_id("revision", &parts);
        self.revisions.insert(id.clone(), revision);
        id
    }

    fn tree_of(&self, reference: &str) -> Option<&Tree> {
        let revision = self.revisions.get(self.resolve(reference)?)?;
        self.trees.get(&revision.tree)
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> bool {
        let mut queue = VecDeque::from([descendant.to_string()]);
        let mut seen = BTreeSet::new();
        while let Some(id) = queue.pop_front() {
            if id == ancestor {
                return true;
            }
            if !seen.insert(id.clone()) {
                continue;
            }
            if let Some(revision) = self.revisions.get(&id) {
                queue.extend(revision.parents.iter().cloned());
            }
        }
        false
    }

    fn ancestry(&self, branch: &str) -> Vec<&Revision> {
        let mut result = Vec::new();
        let mut queue: VecDeque<&String> = self.branches.get(branch).into_iter().collect();
        let mut seen = BTreeSet::new();
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(revision) = self.revisions.get(id) {
                queue.extend(revision.parents.iter());
                result.push(revision);
            }
        }
        result
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Commit `files` on top of `branch` directly, creating the branch when
    /// missing. Returns the new tip.
    pub fn seed(&self, branch: &str, files: &[(&str, &str)]) -> String {
        let mut state = self.state();
        let parent = state.branches.get(branch).cloned();
        let mut tree = parent
            .as_deref()
            .and_then(|tip| state.tree_of(tip))
            .cloned()
            .unwrap_or_default();
        for (path, content) in files {
            let blob = state.put_blob(content);
            tree.insert(path.to_string(), blob);
        }
        let tree = state.put_tree(tree);
        let revision = state.put_revision(Revision {
            tree,
            parents: parent.into_iter().collect(),
            message: format!("seed {} file(s)", files.len()),
        });
        state.branches.insert(branch.to_string(), revision.clone());
        revision
    }

    /// Fail the next call of `step` with `err`.
    pub fn fail_at(&self, step: CommitStep, err: SyncError) {
        self.state().step_failures.insert(step, err);
    }

    /// Fail every read of `path` with `err`.
    pub fn fail_reads(&self, path: &str, err: SyncError) {
        self.state().read_failures.insert(path.to_string(), err);
    }

    pub fn calls(&self, step: CommitStep) -> usize {
        self.state().calls.get(&step).copied().unwrap_or(0)
    }

    pub fn tip(&self, branch: &str) -> Option<String> {
        self.state().branches.get(branch).cloned()
    }

    pub fn parents(&self, revision: &str) -> Vec<String> {
        self.state()
            .revisions
            .get(revision)
            .map(|r| r.parents.clone())
            .unwrap_or_default()
    }

    pub fn message(&self, revision: &str) -> Option<String> {
        self.state().revisions.get(revision).map(|r| r.message.clone())
    }

    /// Number of revisions reachable from `branch`.
    pub fn history_len(&self, branch: &str) -> usize {
        self.state().ancestry(branch).len()
    }

    /// File content at the tip of `branch`.
    pub fn read(&self, branch: &str, path: &str) -> Option<String> {
        let state = self.state();
        let blob = state.tree_of(branch)?.get(path)?;
        state.blobs.get(blob).cloned()
    }

    /// Every blob referenced by any revision reachable from `branch`.
    pub fn reachable_blobs(&self, branch: &str) -> BTreeSet<String> {
        let state = self.state();
        state
            .ancestry(branch)
            .into_iter()
            .filter_map(|revision| state.trees.get(&revision.tree))
            .flat_map(|tree| tree.values().cloned())
            .collect()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn get_file(&self, path: &str, reference: &str) -> Result<Option<RemoteFile>, SyncError> {
        let state = self.state();
        if let Some(err) = state.read_failures.get(path) {
            return Err(err.clone());
        }
        let tree = state
            .tree_of(reference)
            .ok_or_else(|| SyncError::NotFound(format!("reference {}", reference)))?;
        Ok(tree.get(path).and_then(|blob| {
            state.blobs.get(blob).map(|content| RemoteFile {
                content: content.clone(),
                sha: blob.clone(),
            })
        }))
    }

    async fn branch_tip(&self, branch: &str) -> Result<String, SyncError> {
        let mut state = self.state();
        state.enter(CommitStep::ResolveBranch)?;
        state
            .branches
            .get(branch)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("branch {}", branch)))
    }

    async fn revision_tree(&self, revision: &str) -> Result<String, SyncError> {
        let mut state = self.state();
        state.enter(CommitStep::ResolveTree)?;
        state
            .revisions
            .get(revision)
            .map(|r| r.tree.clone())
            .ok_or_else(|| SyncError::NotFound(format!("revision {}", revision)))
    }

    async fn create_blob(&self, content: &str) -> Result<String, SyncError> {
        let mut state = self.state();
        state.enter(CommitStep::CreateBlob)?;
        Ok(state.put_blob(content))
    }

    async fn create_tree(
        &self,
        base_tree: &str,
        entries: &[TreeEntry],
    ) -> Result<String, SyncError> {
        let mut state = self.state();
        state.enter(CommitStep::CreateTree)?;
        let mut tree = state
            .trees
            .get(base_tree)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("tree {}", base_tree)))?;
        for entry in entries {
            if !state.blobs.contains_key(&entry.blob) {
                return Err(SyncError::NotFound(format!("blob {}", entry.blob)));
            }
            tree.insert(entry.path.clone(), entry.blob.clone());
        }
        Ok(state.put_tree(tree))
    }

    async fn create_revision(
        &self,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String, SyncError> {
        let mut state = self.state();
        state.enter(CommitStep::CreateRevision)?;
        if !state.trees.contains_key(tree) {
            return Err(SyncError::NotFound(format!("tree {}", tree)));
        }
        if let Some(missing) = parents.iter().find(|p| !state.revisions.contains_key(*p)) {
            return Err(SyncError::NotFound(format!("revision {}", missing)));
        }
        Ok(state.put_revision(Revision {
            tree: tree.to_string(),
            parents: parents.to_vec(),
            message: message.to_string(),
        }))
    }

    async fn update_branch(&self, branch: &str, revision: &str) -> Result<(), SyncError> {
        let mut state = self.state();
        state.enter(CommitStep::UpdateBranch)?;
        if !state.revisions.contains_key(revision) {
            return Err(SyncError::NotFound(format!("revision {}", revision)));
        }
        let current = state
            .branches
            .get(branch)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("branch {}", branch)))?;
        if !state.is_ancestor(&current, revision) {
            return Err(SyncError::Conflict(format!(
                "branch {} moved to {}; update is not a fast forward",
                branch, current
            )));
        }
        state.branches.insert(branch.to_string(), revision.to_string());
        Ok(())
    }
}

/// Hands out the same shared store whatever the settings say.
impl Connector for Arc<MemoryStore> {
    fn connect(&self, _settings: &SyncSettings) -> Result<Arc<dyn RemoteStore>, SyncError> {
        let store: Arc<dyn RemoteStore> = self.clone();
        Ok(store)
    }
}
