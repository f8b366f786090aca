use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_init_creates_settings() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Created .glot-sync.json"));

    let content = test.read_file(".glot-sync.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Settings should be valid JSON")?;
    assert_eq!(parsed["branch"], "main");
    assert_eq!(parsed["translationsFolder"], "src");
    assert_eq!(parsed["translationsFilename"], "translations.yaml");
    assert_eq!(parsed["languages"], "en_US,de_DE,fr_FR");
    assert_eq!(parsed["repo"], "");
    assert!(content.contains("  "), "Settings should use 2-space indentation");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".glot-sync.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("already exists"));
    assert_eq!(test.read_file(".glot-sync.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_honors_settings_path() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .command()
        .args(["init", "--settings", "config/sync.json"])
        .output();
    // Parent directory does not exist yet
    assert!(!output?.status.success());

    test.write_file("config/.keep", "")?;
    let output = test
        .command()
        .args(["init", "--settings", "config/sync.json"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.root().join("config/sync.json").exists());
    assert!(!test.root().join(".glot-sync.json").exists());

    Ok(())
}
