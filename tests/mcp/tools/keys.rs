use glot_sync::{error::SyncError, mcp::types::SearchKeysParams};
use rmcp::handler::server::wrapper::Parameters;

use crate::{DE_PATH, EN_PATH, McpTestFixture, extract_tool_error_json, extract_tool_result_json};

fn search(query: &str) -> Parameters<SearchKeysParams> {
    Parameters(SearchKeysParams {
        query: query.to_string(),
    })
}

#[tokio::test]
async fn test_fetch_keys_reports_each_language() {
    let fixture = McpTestFixture::new();
    fixture.publish(&[
        (EN_PATH, "checkout.title: Your order\ngreeting: Hello\n"),
        (DE_PATH, "greeting: Hallo\n"),
    ]);

    let result = fixture.server.fetch_keys().await.unwrap();
    let events = extract_tool_result_json(&result);

    assert_eq!(events[0]["type"], "keys-loaded");
    let report = &events[0]["report"];
    assert_eq!(report["totalKeys"], 2);
    assert_eq!(report["languages"][0]["language"], "en_US");
    assert_eq!(report["languages"][0]["status"], "loaded");
    assert_eq!(report["languages"][0]["keys"], 2);
    assert_eq!(report["languages"][1]["path"], DE_PATH);
    assert_eq!(report["languages"][1]["keys"], 1);
    assert_eq!(events[0]["status"]["fetch"], "loaded");
    assert_eq!(events[0]["status"]["keysLoaded"], 2);
}

#[tokio::test]
async fn test_fetch_keys_missing_file_is_empty() {
    let fixture = McpTestFixture::new();
    fixture.publish(&[(EN_PATH, "greeting: Hello\n")]);

    let result = fixture.server.fetch_keys().await.unwrap();
    let events = extract_tool_result_json(&result);

    assert_eq!(events[0]["report"]["languages"][1]["status"], "missing");
    assert_eq!(events[0]["report"]["totalKeys"], 1);
}

#[tokio::test]
async fn test_fetch_keys_degrades_on_malformed_file() {
    let fixture = McpTestFixture::new();
    fixture.publish(&[(EN_PATH, "greeting: Hello\n"), (DE_PATH, "- not\n- a map\n")]);

    let result = fixture.server.fetch_keys().await.unwrap();
    let events = extract_tool_result_json(&result);

    let german = &events[0]["report"]["languages"][1];
    assert_eq!(german["status"], "malformed");
    assert!(german["error"].as_str().unwrap().contains(DE_PATH));
    assert_eq!(events[0]["report"]["totalKeys"], 1);
}

#[tokio::test]
async fn test_fetch_keys_aborts_on_rejected_token() {
    let fixture = McpTestFixture::new();
    fixture.publish(&[(EN_PATH, "greeting: Hello\n")]);
    fixture
        .store
        .fail_reads(EN_PATH, SyncError::Unauthorized("Bad credentials".to_string()));

    let result = fixture.server.fetch_keys().await.unwrap();
    let failure = extract_tool_error_json(&result);

    assert_eq!(failure["operation"], "fetch-keys");
    assert!(failure["error"].as_str().unwrap().contains("Bad credentials"));
}

#[tokio::test]
async fn test_fetch_keys_requires_configuration() {
    let fixture = McpTestFixture::unconfigured();

    let result = fixture.server.fetch_keys().await.unwrap();
    let failure = extract_tool_error_json(&result);

    assert!(
        failure["error"]
            .as_str()
            .unwrap()
            .contains("configure token and repository first")
    );
}

#[tokio::test]
async fn test_search_keys_after_fetch() {
    let fixture = McpTestFixture::new();
    fixture.publish(&[
        (EN_PATH, "farewell: Goodbye\ngreeting: Hello\n"),
        (DE_PATH, "farewell: Tschüss\ngreeting: Hallo\n"),
    ]);
    fixture.server.fetch_keys().await.unwrap();

    let result = fixture.server.search_keys(search("HALL")).await.unwrap();
    let events = extract_tool_result_json(&result);

    assert_eq!(events[0]["type"], "search-result");
    assert_eq!(events[0]["query"], "HALL");
    let matches = events[0]["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["key"], "greeting");
    assert_eq!(matches[0]["keyMatched"], false);
    assert_eq!(matches[0]["matchedLanguages"][0], "de_DE");
    assert_eq!(matches[0]["translations"]["en_US"], "Hello");
}

#[tokio::test]
async fn test_search_keys_without_fetch_is_empty() {
    let fixture = McpTestFixture::new();
    fixture.publish(&[(EN_PATH, "greeting: Hello\n")]);

    let result = fixture.server.search_keys(search("greet")).await.unwrap();
    let events = extract_tool_result_json(&result);

    assert_eq!(events[0]["matches"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_concurrent_call_is_rejected() {
    let fixture = McpTestFixture::new();

    let _running = fixture.server.orchestrator().lock().await;
    let err = fixture.server.fetch_keys().await.unwrap_err();

    assert!(err.message.contains("in progress"));
}
