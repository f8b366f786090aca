use std::sync::Arc;

use glot_sync::{
    config::SyncSettings,
    core::Node,
    host::MemoryHost,
    mcp::GlotSyncMcpServer,
    remote::MemoryStore,
    sync::SyncOrchestrator,
};
use serde_json::Value;

mod tools;

pub const BRANCH: &str = "main";
pub const EN_PATH: &str = "src/en_US/translations.yaml";
pub const DE_PATH: &str = "src/de_DE/translations.yaml";

/// Test fixture for MCP integration tests
///
/// Wires a server to an in-memory repository and an in-memory design host.
/// Both handles stay available for seeding and inspection.
pub struct McpTestFixture {
    pub store: Arc<MemoryStore>,
    pub host: MemoryHost,
    pub server: GlotSyncMcpServer,
}

impl McpTestFixture {
    /// Configured for `acme/site` with English and German, selecting [`checkout_frame`].
    pub fn new() -> Self {
        Self::with_settings(Some(settings()))
    }

    /// No persisted settings: fetch and push are not possible yet.
    pub fn unconfigured() -> Self {
        Self::with_settings(None)
    }

    fn with_settings(settings: Option<SyncSettings>) -> Self {
        let store = Arc::new(MemoryStore::new());
        store.seed(BRANCH, &[("README.md", "# site\n")]);

        let host = MemoryHost::new(vec![checkout_frame()]);
        let host = match settings {
            Some(settings) => host.with_settings(settings),
            None => host,
        };

        let mut orchestrator =
            SyncOrchestrator::new(Box::new(host.clone()), Box::new(store.clone()));
        orchestrator.load_settings().expect("settings should load");

        Self {
            store,
            host,
            server: GlotSyncMcpServer::new(orchestrator),
        }
    }

    /// Commit published translation files directly to the branch.
    pub fn publish(&self, files: &[(&str, &str)]) -> String {
        self.store.seed(BRANCH, files)
    }
}

pub fn settings() -> SyncSettings {
    SyncSettings {
        token: "ghp_secret".to_string(),
        repo: "acme/site".to_string(),
        languages: "en_US,de_DE".to_string(),
        ..Default::default()
    }
}

pub fn checkout_frame() -> Node {
    Node::container(
        "1:1",
        "Checkout",
        vec![
            Node::text("1:2", "checkout.title", "Your order"),
            Node::text("1:3", "Text 7", "Pay now!"),
        ],
    )
}

// ============================================================================
// Assertion Helpers
// ============================================================================

fn result_text(result: &rmcp::model::CallToolResult) -> &str {
    assert!(
        !result.content.is_empty(),
        "Tool result should have content"
    );

    let content_item = &result.content[0];
    &content_item
        .as_text()
        .expect("Tool result content should be text")
        .text
}

/// Extract the event list from a successful CallToolResult
///
/// Panics if the result indicates an error or cannot be parsed
pub fn extract_tool_result_json(result: &rmcp::model::CallToolResult) -> Value {
    if let Some(true) = result.is_error {
        panic!("Tool call returned an error: {:?}", result);
    }
    serde_json::from_str(result_text(result)).expect("Tool result should be valid JSON")
}

/// Extract the `operation-failed` event from a failed CallToolResult
pub fn extract_tool_error_json(result: &rmcp::model::CallToolResult) -> Value {
    assert_eq!(result.is_error, Some(true), "Tool call should fail: {:?}", result);
    let events: Value =
        serde_json::from_str(result_text(result)).expect("Tool result should be valid JSON");
    assert_eq!(events[0]["type"], "operation-failed");
    events[0].clone()
}
