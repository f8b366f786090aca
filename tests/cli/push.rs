use anyhow::Result;

use crate::{CliTest, DOCUMENT, stderr};

#[test]
fn test_push_needs_input() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("push").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("pass --edits or --document"));

    Ok(())
}

#[test]
fn test_push_requires_configuration() -> Result<()> {
    let test = CliTest::with_file("design.json", DOCUMENT)?;
    test.command().arg("init").output()?;

    let output = test
        .command()
        .args(["push", "--document", "design.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("configure token and repository first"));

    Ok(())
}

#[test]
fn test_fetch_requires_configuration() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("fetch").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("configure token and repository first"));

    Ok(())
}

#[test]
fn test_push_rejects_invalid_edits_file() -> Result<()> {
    let test = CliTest::with_file("edits.json", r#"{"key": "not a list"}"#)?;
    test.write_file(
        ".glot-sync.json",
        r#"{"token": "t", "repo": "acme/site"}"#,
    )?;

    let output = test
        .command()
        .args(["push", "--edits", "edits.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to parse edits file"));

    Ok(())
}

#[test]
fn test_rename_needs_document() -> Result<()> {
    let test = CliTest::with_file("edits.json", "[]")?;

    let output = test
        .command()
        .args(["push", "--edits", "edits.json", "--rename-layers"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--rename-layers needs --document"));

    Ok(())
}
