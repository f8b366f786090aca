//! Remote store access.
//!
//! The engine talks to a git object store through [`RemoteStore`]: one file
//! read plus the six calls that compose an atomic multi-file commit.
//!
//! ## Module Structure
//!
//! - `commit`: the commit transaction built on top of the store calls
//! - `encoding`: transport encoding of file contents
//! - `github`: GitHub REST implementation
//! - `memory`: in-process git-like store with fault injection

pub mod commit;
pub mod encoding;
pub mod github;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{config::SyncSettings, error::SyncError};

pub use commit::{CommitStep, CommitTransaction, FileChange, commit_files};
pub use github::{GitHubConnector, GitHubStore};
pub use memory::MemoryStore;

/// A file read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub content: String,
    /// Content identifier of the file's blob.
    pub sha: String,
}

/// A path override applied on top of a base tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: String,
    pub blob: String,
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Read a file at a branch name or revision id. `Ok(None)` when absent.
    async fn get_file(&self, path: &str, reference: &str) -> Result<Option<RemoteFile>, SyncError>;

    /// Current tip revision of a branch.
    async fn branch_tip(&self, branch: &str) -> Result<String, SyncError>;

    /// Tree id of a revision.
    async fn revision_tree(&self, revision: &str) -> Result<String, SyncError>;

    /// Store an immutable content object and return its id.
    async fn create_blob(&self, content: &str) -> Result<String, SyncError>;

    /// Compose a tree from `base_tree` plus `entries`; unlisted paths are carried over.
    async fn create_tree(
        &self,
        base_tree: &str,
        entries: &[TreeEntry],
    ) -> Result<String, SyncError>;

    async fn create_revision(
        &self,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String, SyncError>;

    /// Move `branch` to `revision`, failing with `Conflict` unless this is a
    /// fast-forward from the current tip.
    async fn update_branch(&self, branch: &str, revision: &str) -> Result<(), SyncError>;
}

/// Opens a store for the current settings.
///
/// Settings can change between operations, so the orchestrator connects per
/// fetch or push instead of holding one client.
pub trait Connector: Send + Sync {
    fn connect(&self, settings: &SyncSettings) -> Result<Arc<dyn RemoteStore>, SyncError>;
}
