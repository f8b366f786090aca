use glot_sync::{
    error::SyncError,
    mcp::types::PushTranslationsParams,
    remote::CommitStep,
    sync::{KeyEdit, PUSHED_NOTICE, UP_TO_DATE_NOTICE},
};
use pretty_assertions::assert_eq;
use rmcp::handler::server::wrapper::Parameters;

use crate::{
    BRANCH, DE_PATH, EN_PATH, McpTestFixture, extract_tool_error_json, extract_tool_result_json,
};

fn greeting() -> Vec<KeyEdit> {
    vec![
        KeyEdit::new("greeting")
            .value("en_US", "Hello")
            .value("de_DE", "Hallo"),
    ]
}

fn push(edits: Option<Vec<KeyEdit>>, dry_run: bool) -> Parameters<PushTranslationsParams> {
    Parameters(PushTranslationsParams {
        edits,
        dry_run,
        rename_nodes: false,
    })
}

#[tokio::test]
async fn test_push_commits_all_languages_at_once() {
    let fixture = McpTestFixture::new();
    let base = fixture.store.tip(BRANCH).unwrap();

    let result = fixture
        .server
        .push_translations(push(Some(greeting()), false))
        .await
        .unwrap();
    let events = extract_tool_result_json(&result);

    assert_eq!(events[0]["type"], "pushed");
    let report = &events[0]["report"];
    let tip = fixture.store.tip(BRANCH).unwrap();
    assert_eq!(report["revision"], tip.as_str());
    assert_eq!(report["baseRevision"], base.as_str());
    assert_eq!(fixture.store.parents(&tip), vec![base]);
    assert_eq!(
        report["message"],
        "Update en_US, de_DE translations (1 key)"
    );

    assert_eq!(
        fixture.store.read(BRANCH, EN_PATH).as_deref(),
        Some("greeting: Hello\n")
    );
    assert_eq!(
        fixture.store.read(BRANCH, DE_PATH).as_deref(),
        Some("greeting: Hallo\n")
    );
    assert_eq!(
        fixture.store.read(BRANCH, "README.md").as_deref(),
        Some("# site\n")
    );
    assert_eq!(fixture.host.notifications(), vec![PUSHED_NOTICE]);
}

#[tokio::test]
async fn test_push_keeps_existing_keys() {
    let fixture = McpTestFixture::new();
    fixture.publish(&[(EN_PATH, "farewell: Goodbye\ngreeting: Hi\n")]);

    let result = fixture
        .server
        .push_translations(push(Some(greeting()), false))
        .await
        .unwrap();
    let events = extract_tool_result_json(&result);

    let english = &events[0]["report"]["files"][0];
    assert_eq!(english["updated"], 1);
    assert_eq!(english["totalKeys"], 2);
    assert_eq!(english["existed"], true);
    assert_eq!(
        fixture.store.read(BRANCH, EN_PATH).as_deref(),
        Some("farewell: Goodbye\ngreeting: Hello\n")
    );
}

#[tokio::test]
async fn test_dry_run_does_not_commit() {
    let fixture = McpTestFixture::new();
    let tip = fixture.store.tip(BRANCH);

    let result = fixture
        .server
        .push_translations(push(Some(greeting()), true))
        .await
        .unwrap();
    let events = extract_tool_result_json(&result);

    assert_eq!(events[0]["type"], "push-planned");
    assert_eq!(events[0]["plan"]["files"][1]["added"], 1);
    assert_eq!(fixture.store.tip(BRANCH), tip);
    assert!(fixture.store.read(BRANCH, EN_PATH).is_none());
}

#[tokio::test]
async fn test_push_selection_and_rename_layers() {
    let fixture = McpTestFixture::new();

    let params = Parameters(PushTranslationsParams {
        edits: None,
        dry_run: false,
        rename_nodes: true,
    });
    let result = fixture.server.push_translations(params).await.unwrap();
    let events = extract_tool_result_json(&result);

    assert_eq!(events[0]["report"]["renamed"], 2);
    assert_eq!(
        fixture.store.read(BRANCH, EN_PATH).as_deref(),
        Some("checkout.title: Your order\npay_now: Pay now!\n")
    );
    // Only the source language has values
    assert!(fixture.store.read(BRANCH, DE_PATH).is_none());
    assert_eq!(fixture.host.node_name("1:3").as_deref(), Some("pay_now"));
}

#[tokio::test]
async fn test_repeated_push_is_a_noop() {
    let fixture = McpTestFixture::new();
    fixture
        .server
        .push_translations(push(Some(greeting()), false))
        .await
        .unwrap();
    let tip = fixture.store.tip(BRANCH);

    let result = fixture
        .server
        .push_translations(push(Some(greeting()), false))
        .await
        .unwrap();
    let events = extract_tool_result_json(&result);

    assert!(events[0]["report"]["revision"].is_null());
    assert_eq!(fixture.store.tip(BRANCH), tip);
    assert_eq!(
        fixture.host.notifications().last().map(String::as_str),
        Some(UP_TO_DATE_NOTICE)
    );
}

#[tokio::test]
async fn test_rejected_ref_update_leaves_branch_untouched() {
    let fixture = McpTestFixture::new();
    let tip = fixture.store.tip(BRANCH);
    fixture.store.fail_at(
        CommitStep::UpdateBranch,
        SyncError::Conflict("Update is not a fast forward".to_string()),
    );

    let result = fixture
        .server
        .push_translations(push(Some(greeting()), false))
        .await
        .unwrap();
    let failure = extract_tool_error_json(&result);

    assert_eq!(failure["operation"], "push");
    assert!(failure["error"].as_str().unwrap().starts_with("conflict"));
    assert_eq!(fixture.store.tip(BRANCH), tip);
    assert!(fixture.store.read(BRANCH, EN_PATH).is_none());
    assert!(fixture.host.notifications().is_empty());
}

#[tokio::test]
async fn test_push_requires_configuration() {
    let fixture = McpTestFixture::unconfigured();

    let result = fixture
        .server
        .push_translations(push(Some(greeting()), false))
        .await
        .unwrap();
    let failure = extract_tool_error_json(&result);

    assert!(
        failure["error"]
            .as_str()
            .unwrap()
            .contains("configure token and repository first")
    );
}
