//! GitHub REST implementation of [`RemoteStore`].
//!
//! Reads use the contents API; commits use the git data API (blobs, trees,
//! commits, refs). The ref update is sent with `force: false`, so GitHub
//! rejects anything that is not a fast-forward.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use super::{
    Connector, RemoteFile, RemoteStore, TreeEntry,
    encoding::{BASE64_ENCODING, UTF8_ENCODING, decode_content},
};
use crate::{config::SyncSettings, error::SyncError};

const USER_AGENT: &str = concat!("glot-sync/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";
const FILE_MODE: &str = "100644";

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BlobResponse {
    content: String,
    encoding: String,
}

#[derive(Debug, Deserialize)]
struct ShaOnly {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RefResponse {
    object: ShaOnly,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    tree: ShaOnly,
}

#[derive(Serialize)]
struct NewBlob<'a> {
    content: &'a str,
    encoding: &'a str,
}

#[derive(Serialize)]
struct NewTreeEntry<'a> {
    path: &'a str,
    mode: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    sha: &'a str,
}

#[derive(Serialize)]
struct NewTree<'a> {
    base_tree: &'a str,
    tree: Vec<NewTreeEntry<'a>>,
}

#[derive(Serialize)]
struct NewCommit<'a> {
    message: &'a str,
    tree: &'a str,
    parents: &'a [String],
}

#[derive(Serialize)]
struct RefUpdate<'a> {
    sha: &'a str,
    force: bool,
}

pub struct GitHubStore {
    client: Client,
    repo_url: String,
    token: String,
}

impl GitHubStore {
    pub fn new(settings: &SyncSettings) -> Result<Self, SyncError> {
        let (owner, name) = settings.repo_parts()?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SyncError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            repo_url: format!(
                "{}/repos/{}/{}",
                settings.api_base.trim_end_matches('/'),
                owner,
                name
            ),
            token: settings.token.trim().to_string(),
        })
    }

    fn request(&self, method: Method, suffix: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.repo_url, suffix);
        debug!(%method, %url, "GitHub request");
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, SyncError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &body, what));
        }
        serde_json::from_str(&body).map_err(|e| SyncError::Api {
            status: status.as_u16(),
            message: format!("unexpected response for {}: {}", what, e),
        })
    }

    /// Files over 1 MB come back from the contents API without inline content.
    async fn read_blob(&self, sha: &str, path: &str) -> Result<String, SyncError> {
        let blob: BlobResponse = self
            .send(self.request(Method::GET, &format!("git/blobs/{}", sha)), path)
            .await?;
        if blob.encoding != BASE64_ENCODING {
            return Err(SyncError::malformed(
                path,
                format!("unsupported blob encoding '{}'", blob.encoding),
            ));
        }
        decode_content(&blob.content, path)
    }
}

/// Map a non-success response to an error, keeping GitHub's message.
fn status_error(status: StatusCode, body: &str, what: &str) -> SyncError {
    let message = serde_json::from_str::<ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED => SyncError::Unauthorized(message),
        StatusCode::FORBIDDEN => SyncError::Forbidden(message),
        StatusCode::NOT_FOUND => SyncError::NotFound(what.to_string()),
        StatusCode::CONFLICT => SyncError::Conflict(message),
        _ => SyncError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl RemoteStore for GitHubStore {
    async fn get_file(&self, path: &str, reference: &str) -> Result<Option<RemoteFile>, SyncError> {
        let request = self
            .request(Method::GET, &format!("contents/{}", path))
            .query(&[("ref", reference)]);

        let contents: ContentsResponse = match self.send(request, path).await {
            Ok(contents) => contents,
            Err(SyncError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let content = match (contents.encoding.as_deref(), contents.content.as_deref()) {
            (Some(BASE64_ENCODING), Some(payload)) => decode_content(payload, path)?,
            (Some(BASE64_ENCODING), None) | (Some("none"), _) | (None, _) => {
                self.read_blob(&contents.sha, path).await?
            }
            (Some(other), _) => {
                return Err(SyncError::malformed(
                    path,
                    format!("unsupported content encoding '{}'", other),
                ));
            }
        };

        Ok(Some(RemoteFile {
            content,
            sha: contents.sha,
        }))
    }

    async fn branch_tip(&self, branch: &str) -> Result<String, SyncError> {
        let reference: RefResponse = self
            .send(
                self.request(Method::GET, &format!("git/ref/heads/{}", branch)),
                &format!("branch {}", branch),
            )
            .await?;
        Ok(reference.object.sha)
    }

    async fn revision_tree(&self, revision: &str) -> Result<String, SyncError> {
        let commit: CommitResponse = self
            .send(
                self.request(Method::GET, &format!("git/commits/{}", revision)),
                &format!("revision {}", revision),
            )
            .await?;
        Ok(commit.tree.sha)
    }

    async fn create_blob(&self, content: &str) -> Result<String, SyncError> {
        let body = NewBlob {
            content,
            encoding: UTF8_ENCODING,
        };
        let blob: ShaOnly = self
            .send(self.request(Method::POST, "git/blobs").json(&body), "blob")
            .await?;
        Ok(blob.sha)
    }

    async fn create_tree(
        &self,
        base_tree: &str,
        entries: &[TreeEntry],
    ) -> Result<String, SyncError> {
        let body = NewTree {
            base_tree,
            tree: entries
                .iter()
                .map(|entry| NewTreeEntry {
                    path: &entry.path,
                    mode: FILE_MODE,
                    kind: "blob",
                    sha: &entry.blob,
                })
                .collect(),
        };
        let tree: ShaOnly = self
            .send(self.request(Method::POST, "git/trees").json(&body), "tree")
            .await?;
        Ok(tree.sha)
    }

    async fn create_revision(
        &self,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String, SyncError> {
        let body = NewCommit {
            message,
            tree,
            parents,
        };
        let commit: ShaOnly = self
            .send(self.request(Method::POST, "git/commits").json(&body), "commit")
            .await?;
        Ok(commit.sha)
    }

    async fn update_branch(&self, branch: &str, revision: &str) -> Result<(), SyncError> {
        let body = RefUpdate {
            sha: revision,
            force: false,
        };
        let request = self
            .request(Method::PATCH, &format!("git/refs/heads/{}", branch))
            .json(&body);

        match self.send::<serde_json::Value>(request, &format!("branch {}", branch)).await {
            Ok(_) => Ok(()),
            // "Update is not a fast forward"
            Err(SyncError::Api { status: 422, message }) => Err(SyncError::Conflict(message)),
            Err(e) => Err(e),
        }
    }
}

/// Connects to GitHub with the token and repository from the settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitHubConnector;

impl Connector for GitHubConnector {
    fn connect(&self, settings: &SyncSettings) -> Result<Arc<dyn RemoteStore>, SyncError> {
        settings.ensure_configured()?;
        let store: Arc<dyn RemoteStore> = Arc::new(GitHubStore::new(settings)?);
        Ok(store)
    }
}
