use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

pub const CONFIG_FILE_NAME: &str = ".glot-sync.json";

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Identifier of one language, e.g. `en_US`. Also a path segment of the remote layout.
pub type LanguageCode = String;

/// Connection and layout settings owned by the sync orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    #[serde(default)]
    pub token: String,
    /// Repository as `owner/name`.
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_translations_folder")]
    pub translations_folder: String,
    #[serde(default = "default_translations_filename")]
    pub translations_filename: String,
    /// Comma-separated language codes; the first one is the source language.
    #[serde(default = "default_languages")]
    pub languages: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_translations_folder() -> String {
    "src".to_string()
}

fn default_translations_filename() -> String {
    "translations.yaml".to_string()
}

fn default_languages() -> String {
    "en_US,de_DE,fr_FR".to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            token: String::new(),
            repo: String::new(),
            branch: default_branch(),
            translations_folder: default_translations_folder(),
            translations_filename: default_translations_filename(),
            languages: default_languages(),
            api_base: default_api_base(),
        }
    }
}

impl SyncSettings {
    /// Active languages in configured order, trimmed and de-duplicated.
    pub fn languages(&self) -> Vec<LanguageCode> {
        parse_languages(&self.languages)
    }

    /// The language seeded with the extracted text.
    pub fn source_language(&self) -> Option<LanguageCode> {
        self.languages().into_iter().next()
    }

    /// True when both a token and a repository are present.
    pub fn is_configured(&self) -> bool {
        !self.token.trim().is_empty() && !self.repo.trim().is_empty()
    }

    /// Split `owner/name` into its two parts.
    pub fn repo_parts(&self) -> Result<(&str, &str), SyncError> {
        let repo = self.repo.trim();
        match repo.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok((owner, name))
            }
            _ => Err(SyncError::Settings(format!(
                "repository must look like \"owner/name\", got \"{}\"",
                repo
            ))),
        }
    }

    /// Remote path of one language's table: `{folder}/{language}/{filename}`.
    pub fn file_path(&self, language: &str) -> String {
        let folder = self.translations_folder.trim().trim_matches('/');
        let filename = self.translations_filename.trim().trim_matches('/');
        if folder.is_empty() {
            format!("{}/{}", language, filename)
        } else {
            format!("{}/{}/{}", folder, language, filename)
        }
    }

    /// Fail unless fetch and push have what they need.
    pub fn ensure_configured(&self) -> Result<(), SyncError> {
        if !self.is_configured() {
            return Err(SyncError::Settings(
                "configure token and repository first".to_string(),
            ));
        }
        self.validate()
    }

    /// Validate settings values.
    ///
    /// The repository may still be empty here; `ensure_configured` covers that.
    pub fn validate(&self) -> Result<(), SyncError> {
        if !self.repo.trim().is_empty() {
            self.repo_parts()?;
        }
        if self.branch.trim().is_empty() {
            return Err(SyncError::Settings("branch cannot be empty".to_string()));
        }
        if self.translations_filename.trim().trim_matches('/').is_empty() {
            return Err(SyncError::Settings(
                "translations filename cannot be empty".to_string(),
            ));
        }
        let languages = self.languages();
        if languages.is_empty() {
            return Err(SyncError::Settings(
                "at least one language is required".to_string(),
            ));
        }
        for language in &languages {
            validate_language_code(language)
                .map_err(|msg| SyncError::Settings(format!("language '{}': {}", language, msg)))?;
        }
        Ok(())
    }

    /// Copy with the token masked, for display.
    pub fn redacted(&self) -> Self {
        let token = if self.token.is_empty() {
            String::new()
        } else {
            "********".to_string()
        };
        Self {
            token,
            ..self.clone()
        }
    }
}

/// Parse a comma-separated language list, preserving the first occurrence of each code.
pub fn parse_languages(csv: &str) -> Vec<LanguageCode> {
    let mut languages: Vec<LanguageCode> = Vec::new();
    for code in csv.split(',').map(str::trim).filter(|code| !code.is_empty()) {
        if !languages.iter().any(|existing| existing == code) {
            languages.push(code.to_string());
        }
    }
    languages
}

/// Language codes become path segments: only letters, digits, hyphens and underscores.
pub fn validate_language_code(code: &str) -> Result<(), String> {
    if code.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(
            "Language code can only contain letters, numbers, hyphens, and underscores"
                .to_string(),
        );
    }
    Ok(())
}

pub fn default_settings_json() -> Result<String> {
    let settings = SyncSettings::default();
    serde_json::to_string_pretty(&settings).context("Failed to generate default settings.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

pub fn read_settings_file(path: &Path) -> Result<SyncSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    let settings: SyncSettings = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
    settings
        .validate()
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    Ok(settings)
}

pub fn write_settings_file(path: &Path, settings: &SyncSettings) -> Result<()> {
    let mut content =
        serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    content.push('\n');
    fs::write(path, content)
        .with_context(|| format!("Failed to write settings file: {}", path.display()))
}
