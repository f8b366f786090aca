//! Atomic multi-file commits.
//!
//! A commit is composed from six store calls:
//!
//! 1. resolve the branch tip
//! 2. resolve the tip's tree
//! 3. create one blob per changed file
//! 4. create a tree from the base tree plus the changed paths
//! 5. create a revision with the old tip as parent
//! 6. fast-forward the branch to the new revision
//!
//! Nothing is visible on the branch until step 6 succeeds, so a failure at
//! any step leaves the branch exactly as it was. Objects created before the
//! failure stay unreachable. A branch that moved since step 1 makes step 6
//! fail with `Conflict`; there is no retry.

use std::fmt;

use tracing::{debug, info, warn};

use super::{RemoteFile, RemoteStore, TreeEntry};
use crate::error::SyncError;

/// New content for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub content: String,
}

impl FileChange {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitStep {
    ResolveBranch,
    ResolveTree,
    CreateBlob,
    CreateTree,
    CreateRevision,
    UpdateBranch,
}

impl fmt::Display for CommitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommitStep::ResolveBranch => "resolve branch",
            CommitStep::ResolveTree => "resolve tree",
            CommitStep::CreateBlob => "create blob",
            CommitStep::CreateTree => "create tree",
            CommitStep::CreateRevision => "create revision",
            CommitStep::UpdateBranch => "update branch",
        };
        f.write_str(name)
    }
}

/// A commit in preparation against a fixed base revision.
///
/// Reads go through [`CommitTransaction::read_file`] so merged content is
/// computed from the same revision the commit will name as parent.
pub struct CommitTransaction<'a> {
    store: &'a dyn RemoteStore,
    branch: String,
    base_revision: String,
    base_tree: String,
    staged: Vec<FileChange>,
}

impl<'a> CommitTransaction<'a> {
    /// Steps 1 and 2: pin the branch tip and its tree.
    pub async fn begin(store: &'a dyn RemoteStore, branch: &str) -> Result<Self, SyncError> {
        let base_revision = store
            .branch_tip(branch)
            .await
            .map_err(|e| step_failed(CommitStep::ResolveBranch, e))?;
        let base_tree = store
            .revision_tree(&base_revision)
            .await
            .map_err(|e| step_failed(CommitStep::ResolveTree, e))?;
        debug!(branch, %base_revision, %base_tree, "Commit transaction started");

        Ok(Self {
            store,
            branch: branch.to_string(),
            base_revision,
            base_tree,
            staged: Vec::new(),
        })
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn base_revision(&self) -> &str {
        &self.base_revision
    }

    pub fn staged(&self) -> &[FileChange] {
        &self.staged
    }

    /// Read a file as of the base revision.
    pub async fn read_file(&self, path: &str) -> Result<Option<RemoteFile>, SyncError> {
        self.store.get_file(path, &self.base_revision).await
    }

    /// Stage new content for a path, replacing earlier content for the same path.
    pub fn stage(&mut self, change: FileChange) {
        match self.staged.iter_mut().find(|c| c.path == change.path) {
            Some(existing) => *existing = change,
            None => self.staged.push(change),
        }
    }

    /// Steps 3 to 6. Returns the new revision id.
    pub async fn commit(self, message: &str) -> Result<String, SyncError> {
        if self.staged.is_empty() {
            return Err(SyncError::Invalid("no files staged for commit".to_string()));
        }

        let mut entries = Vec::with_capacity(self.staged.len());
        for change in &self.staged {
            let blob = self
                .store
                .create_blob(&change.content)
                .await
                .map_err(|e| step_failed(CommitStep::CreateBlob, e))?;
            debug!(path = %change.path, %blob, "Blob created");
            entries.push(TreeEntry {
                path: change.path.clone(),
                blob,
            });
        }

        let tree = self
            .store
            .create_tree(&self.base_tree, &entries)
            .await
            .map_err(|e| step_failed(CommitStep::CreateTree, e))?;

        let revision = self
            .store
            .create_revision(message, &tree, std::slice::from_ref(&self.base_revision))
            .await
            .map_err(|e| step_failed(CommitStep::CreateRevision, e))?;

        self.store
            .update_branch(&self.branch, &revision)
            .await
            .map_err(|e| step_failed(CommitStep::UpdateBranch, e))?;

        info!(
            branch = %self.branch,
            %revision,
            parent = %self.base_revision,
            files = self.staged.len(),
            "Committed"
        );
        Ok(revision)
    }
}

fn step_failed(step: CommitStep, err: SyncError) -> SyncError {
    warn!(%step, error = %err, "Commit aborted");
    err
}

/// Commit all `files` to `branch` as one revision.
pub async fn commit_files(
    store: &dyn RemoteStore,
    branch: &str,
    files: Vec<FileChange>,
    message: &str,
) -> Result<String, SyncError> {
    let mut transaction = CommitTransaction::begin(store, branch).await?;
    for change in files {
        transaction.stage(change);
    }
    transaction.commit(message).await
}
