use std::sync::Arc;

use anyhow::Result;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use tokio::sync::Mutex;
use tracing::debug;

use super::types::{PushTranslationsParams, SaveSettingsParams, SearchKeysParams};
use crate::sync::{Event, Request, SyncOrchestrator};

#[derive(Clone)]
pub struct GlotSyncMcpServer {
    orchestrator: Arc<Mutex<SyncOrchestrator>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl GlotSyncMcpServer {
    pub fn new(orchestrator: SyncOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(Mutex::new(orchestrator)),
            tool_router: Self::tool_router(),
        }
    }

    pub fn orchestrator(&self) -> &Arc<Mutex<SyncOrchestrator>> {
        &self.orchestrator
    }

    /// Send one request to the orchestrator. A call arriving while another
    /// one holds it is rejected, not queued.
    async fn run(&self, request: Request) -> Result<CallToolResult, McpError> {
        let mut orchestrator = self.orchestrator.try_lock().map_err(|_| busy())?;
        debug!(request = request.name(), "MCP request");
        let events = orchestrator.handle(request).await;
        events_result(&events)
    }

    /// Extract text from the current selection
    #[tool(
        description = "Extract translatable text from the current design selection. Returns text units (node id, text, layer name, suggested key) and starting edits with the text in the source language."
    )]
    pub async fn get_selection(&self) -> Result<CallToolResult, McpError> {
        self.run(Request::GetSelection).await
    }

    /// Get current sync settings
    #[tool(description = "Get the current sync settings. The token is never returned.")]
    pub async fn get_settings(&self) -> Result<CallToolResult, McpError> {
        let settings = self
            .orchestrator
            .try_lock()
            .map_err(|_| busy())?
            .settings()
            .redacted();
        events_result(&[Event::SettingsLoaded { settings }])
    }

    /// Update and persist sync settings
    #[tool(
        description = "Update sync settings (token, repo, branch, translationsFolder, translationsFilename, languages). Omitted fields are kept. Settings are validated and persisted."
    )]
    pub async fn save_settings(
        &self,
        params: Parameters<SaveSettingsParams>,
    ) -> Result<CallToolResult, McpError> {
        let settings = {
            let orchestrator = self.orchestrator.try_lock().map_err(|_| busy())?;
            params.0.apply_to(orchestrator.settings())
        };
        self.run(Request::SaveSettings { settings }).await
    }

    /// Fetch published keys from the repository
    #[tool(
        description = "Fetch every configured language's translation file from the repository and rebuild the key index. Missing files count as empty; per-language failures are reported but do not abort the fetch."
    )]
    pub async fn fetch_keys(&self) -> Result<CallToolResult, McpError> {
        self.run(Request::FetchKeys).await
    }

    /// Search loaded keys
    #[tool(
        description = "Search the loaded keys (case-insensitive substring over keys and all language values). Returns at most 10 matches with their translations. Call fetch_keys first."
    )]
    pub async fn search_keys(
        &self,
        params: Parameters<SearchKeysParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Request::SearchKeys {
            query: params.0.query,
        })
        .await
    }

    /// Push translations as one commit
    #[tool(
        description = "Merge translations into each language's file and commit all changed files to the branch as a single commit. Existing keys not in the edits are kept. Use dryRun to preview the merged files."
    )]
    pub async fn push_translations(
        &self,
        params: Parameters<PushTranslationsParams>,
    ) -> Result<CallToolResult, McpError> {
        let PushTranslationsParams {
            edits,
            dry_run,
            rename_nodes,
        } = params.0;

        let edits = match edits {
            Some(edits) => edits,
            None => {
                let mut orchestrator = self.orchestrator.try_lock().map_err(|_| busy())?;
                orchestrator
                    .refresh_selection()
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                orchestrator.default_edits()
            }
        };
        self.run(Request::Push {
            edits,
            dry_run,
            rename_nodes,
        })
        .await
    }
}

fn busy() -> McpError {
    McpError::invalid_request("Another sync operation is in progress", None)
}

/// Events as pretty JSON; an `operation-failed` event marks the result as an error.
fn events_result(events: &[Event]) -> Result<CallToolResult, McpError> {
    let json_str = serde_json::to_string_pretty(events).map_err(|e| {
        McpError::internal_error(format!("JSON serialization failed: {}", e), None)
    })?;

    if events
        .iter()
        .any(|e| matches!(e, Event::OperationFailed { .. }))
    {
        Ok(CallToolResult::error(vec![Content::text(json_str)]))
    } else {
        Ok(CallToolResult::success(vec![Content::text(json_str)]))
    }
}

#[tool_handler]
impl ServerHandler for GlotSyncMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Glot Sync publishes design text as translation keys to per-language YAML files in a GitHub repository.\n\n\
                 Available tools:\n\
                 1. get_settings - Show repository, branch, layout and languages\n\
                 2. save_settings - Change settings (token and repo are required before fetch/push)\n\
                 3. get_selection - Extract text and suggested keys from the current selection\n\
                 4. fetch_keys - Load already published keys\n\
                 5. search_keys - Find existing keys by key or translated text\n\
                 6. push_translations - Merge and commit translations atomically\n\n\
                 Recommended Workflow:\n\
                 1. fetch_keys, then search_keys to reuse existing keys\n\
                 2. get_selection to see new text and suggested keys\n\
                 3. push_translations with dryRun to preview, then without to commit"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Entry point for MCP server
pub fn run_server(orchestrator: SyncOrchestrator) -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let service = GlotSyncMcpServer::new(orchestrator);
            let server = service.serve(rmcp::transport::stdio()).await?;
            server.waiting().await?;
            Ok(())
        })
}
