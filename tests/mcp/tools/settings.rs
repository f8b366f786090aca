use glot_sync::mcp::types::SaveSettingsParams;
use rmcp::handler::server::wrapper::Parameters;

use crate::{McpTestFixture, extract_tool_error_json, extract_tool_result_json};

#[tokio::test]
async fn test_get_settings_redacts_token() {
    let fixture = McpTestFixture::new();

    let result = fixture.server.get_settings().await.unwrap();
    let events = extract_tool_result_json(&result);

    assert_eq!(events[0]["type"], "settings-loaded");
    assert_eq!(events[0]["settings"]["repo"], "acme/site");
    assert_eq!(events[0]["settings"]["languages"], "en_US,de_DE");
    assert_ne!(events[0]["settings"]["token"], "ghp_secret");
}

#[tokio::test]
async fn test_save_settings_keeps_omitted_fields() {
    let fixture = McpTestFixture::new();

    let params = Parameters(SaveSettingsParams {
        branch: Some("develop".to_string()),
        ..Default::default()
    });
    let result = fixture.server.save_settings(params).await.unwrap();
    let events = extract_tool_result_json(&result);
    assert_eq!(events[0]["type"], "settings-saved");
    assert_eq!(events[0]["settings"]["branch"], "develop");

    let persisted = fixture.host.settings().unwrap();
    assert_eq!(persisted.branch, "develop");
    assert_eq!(persisted.token, "ghp_secret");
    assert_eq!(persisted.repo, "acme/site");
}

#[tokio::test]
async fn test_save_settings_configures_unconfigured_host() {
    let fixture = McpTestFixture::unconfigured();
    assert!(fixture.host.settings().is_none());

    let params = Parameters(SaveSettingsParams {
        token: Some("ghp_new".to_string()),
        repo: Some("acme/app".to_string()),
        ..Default::default()
    });
    let result = fixture.server.save_settings(params).await.unwrap();
    extract_tool_result_json(&result);

    let persisted = fixture.host.settings().unwrap();
    assert_eq!(persisted.repo, "acme/app");
    assert_eq!(persisted.token, "ghp_new");
}

#[tokio::test]
async fn test_save_settings_rejects_invalid_values() {
    let fixture = McpTestFixture::new();

    let params = Parameters(SaveSettingsParams {
        languages: Some("en US".to_string()),
        ..Default::default()
    });
    let result = fixture.server.save_settings(params).await.unwrap();
    let failure = extract_tool_error_json(&result);

    assert_eq!(failure["operation"], "save-settings");
    assert_eq!(fixture.host.settings().unwrap().languages, "en_US,de_DE");
}
