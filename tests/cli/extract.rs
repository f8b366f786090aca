use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, DOCUMENT, stderr, stdout};

#[test]
fn test_extract_table() -> Result<()> {
    let test = CliTest::with_file("design.json", DOCUMENT)?;

    let output = test.command().args(["extract", "design.json"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("1:2  checkout.title  Your order"));
    assert!(out.contains("1:3  pay_now         Pay now!"));
    assert!(!out.contains("42"), "digit-only text is skipped");
    assert!(out.contains("2 text units"));

    Ok(())
}

#[test]
fn test_extract_json_in_document_order() -> Result<()> {
    let test = CliTest::with_file("design.json", DOCUMENT)?;

    let output = test
        .command()
        .args(["extract", "design.json", "--json"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let units: Value = serde_json::from_str(&stdout(&output))?;
    let units = units.as_array().expect("array of text units");
    assert_eq!(units.len(), 2);
    assert_eq!(units[0]["id"], "1:2");
    assert_eq!(units[0]["suggestedKey"], "checkout.title");
    assert_eq!(units[1]["labelName"], "Text 7");
    assert_eq!(units[1]["text"], "Pay now!");

    Ok(())
}

#[test]
fn test_extract_selected_node() -> Result<()> {
    let test = CliTest::with_file("design.json", DOCUMENT)?;

    let output = test
        .command()
        .args(["extract", "design.json", "--node", "1:3", "--json"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let units: Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(units.as_array().map(Vec::len), Some(1));
    assert_eq!(units[0]["suggestedKey"], "pay_now");

    Ok(())
}

#[test]
fn test_extract_unknown_node() -> Result<()> {
    let test = CliTest::with_file("design.json", DOCUMENT)?;

    let output = test
        .command()
        .args(["extract", "design.json", "--node", "9:9"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Node '9:9' not found"));

    Ok(())
}

#[test]
fn test_extract_invalid_document() -> Result<()> {
    let test = CliTest::with_file("design.json", "not json")?;

    let output = test.command().args(["extract", "design.json"]).output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to parse document"));

    Ok(())
}
