use schemars::JsonSchema;
use serde::Deserialize;

use crate::{config::SyncSettings, sync::KeyEdit};

// ============================================================
// Settings (save_settings)
// ============================================================

/// Partial settings update. Omitted fields keep their current value.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettingsParams {
    /// GitHub token with contents write access
    pub token: Option<String>,
    /// Repository as "owner/name"
    pub repo: Option<String>,
    pub branch: Option<String>,
    /// Folder holding one sub-folder per language
    pub translations_folder: Option<String>,
    /// File name inside each language folder, e.g. "translations.yaml"
    pub translations_filename: Option<String>,
    /// Comma-separated language codes; the first is the source language
    pub languages: Option<String>,
    pub api_base: Option<String>,
}

impl SaveSettingsParams {
    pub fn apply_to(self, current: &SyncSettings) -> SyncSettings {
        let current = current.clone();
        SyncSettings {
            token: self.token.unwrap_or(current.token),
            repo: self.repo.unwrap_or(current.repo),
            branch: self.branch.unwrap_or(current.branch),
            translations_folder: self.translations_folder.unwrap_or(current.translations_folder),
            translations_filename: self
                .translations_filename
                .unwrap_or(current.translations_filename),
            languages: self.languages.unwrap_or(current.languages),
            api_base: self.api_base.unwrap_or(current.api_base),
        }
    }
}

// ============================================================
// Search (search_keys)
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchKeysParams {
    /// Case-insensitive text matched against keys and every language's value
    pub query: String,
}

// ============================================================
// Push (push_translations)
// ============================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushTranslationsParams {
    /// Keys with their value per language. When omitted, the current selection's
    /// text is pushed under its suggested keys in the source language.
    pub edits: Option<Vec<KeyEdit>>,
    /// Only compute the merged files, do not commit
    #[serde(default)]
    pub dry_run: bool,
    /// Rename pushed nodes to their key
    #[serde(default)]
    pub rename_nodes: bool,
}
