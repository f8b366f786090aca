//! Push planning: operator edits to per-language files.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::{LanguageCode, SyncSettings},
    core::{
        MergeStats, TextUnit, TranslationTable, merge_tables, parse_table_exact, serialize_table,
    },
    error::SyncError,
    remote::CommitTransaction,
};

/// One row of operator input: a key and its value per language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeyEdit {
    /// Node the key was assigned to, if it came from the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub key: String,
    #[serde(default)]
    pub values: BTreeMap<LanguageCode, String>,
}

impl KeyEdit {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }

    pub fn value(mut self, language: &str, value: &str) -> Self {
        self.values.insert(language.to_string(), value.to_string());
        self
    }
}

/// Edits an operator starts from: suggested key, source text in the source language.
pub fn default_edits(units: &[TextUnit], source_language: &str) -> Vec<KeyEdit> {
    units
        .iter()
        .map(|unit| KeyEdit {
            node_id: Some(unit.id.clone()),
            key: unit.suggested_key.clone(),
            values: BTreeMap::from([(source_language.to_string(), unit.text.clone())]),
        })
        .collect()
}

/// Group edits into one candidate table per language, in configured order.
///
/// Keys and values are trimmed; empty ones are skipped. A key given twice
/// keeps the later value. Languages without any value are left out.
pub fn group_edits(
    edits: &[KeyEdit],
    languages: &[LanguageCode],
) -> IndexMap<LanguageCode, TranslationTable> {
    for edit in edits {
        for language in edit.values.keys() {
            if !languages.contains(language) {
                warn!(key = %edit.key, %language, "Value for unconfigured language ignored");
            }
        }
    }

    languages
        .iter()
        .filter_map(|language| {
            let table: TranslationTable = edits
                .iter()
                .filter_map(|edit| {
                    let key = edit.key.trim();
                    let value = edit.values.get(language)?.trim();
                    (!key.is_empty() && !value.is_empty())
                        .then(|| (key.to_string(), value.to_string()))
                })
                .collect();
            (!table.is_empty()).then(|| (language.clone(), table))
        })
        .collect()
}

/// Number of distinct keys across all candidate tables.
pub fn distinct_keys(grouped: &IndexMap<LanguageCode, TranslationTable>) -> usize {
    let mut keys: Vec<&String> = grouped.values().flat_map(|table| table.keys()).collect();
    keys.sort();
    keys.dedup();
    keys.len()
}

/// Commit message naming the languages written and the keys pushed.
pub fn commit_message(languages: &[&str], keys: usize) -> String {
    format!(
        "Update {} translations ({} {})",
        languages.join(", "),
        keys,
        if keys == 1 { "key" } else { "keys" }
    )
}

/// Merged result for one language's file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePlan {
    pub language: LanguageCode,
    pub path: String,
    #[serde(flatten)]
    pub stats: MergeStats,
    pub total_keys: usize,
    /// Whether the file existed at the base revision.
    pub existed: bool,
    #[serde(skip)]
    pub content: String,
}

impl FilePlan {
    /// Files whose keys did not change are not written.
    pub fn is_changed(&self) -> bool {
        self.stats.changed()
    }
}

/// What a push would write, computed against one base revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPlan {
    pub branch: String,
    pub base_revision: String,
    pub message: String,
    pub files: Vec<FilePlan>,
}

impl PushPlan {
    pub fn changed_files(&self) -> impl Iterator<Item = &FilePlan> {
        self.files.iter().filter(|file| file.is_changed())
    }

    pub fn is_noop(&self) -> bool {
        self.changed_files().next().is_none()
    }
}

/// Read every target file at the transaction's base revision and merge the
/// candidates into it.
///
/// Any read or parse failure aborts: writing a file that could not be read
/// would replace remote content instead of merging into it.
pub async fn plan_files(
    transaction: &CommitTransaction<'_>,
    settings: &SyncSettings,
    grouped: &IndexMap<LanguageCode, TranslationTable>,
) -> Result<PushPlan, SyncError> {
    let mut files = Vec::with_capacity(grouped.len());

    for (language, candidate) in grouped {
        let path = settings.file_path(language);
        let existing = transaction.read_file(&path).await?;
        let current = match &existing {
            Some(file) => parse_table_exact(&file.content, &path)?,
            None => TranslationTable::new(),
        };

        let (merged, stats) = merge_tables(&current, candidate);
        debug!(
            %language,
            %path,
            added = stats.added,
            updated = stats.updated,
            unchanged = stats.unchanged,
            "Merged"
        );
        files.push(FilePlan {
            language: language.clone(),
            path,
            stats,
            total_keys: merged.len(),
            existed: existing.is_some(),
            content: serialize_table(&merged),
        });
    }

    let written: Vec<&str> = files
        .iter()
        .filter(|file| file.is_changed())
        .map(|file| file.language.as_str())
        .collect();
    let message = commit_message(&written, distinct_keys(grouped));

    Ok(PushPlan {
        branch: transaction.branch().to_string(),
        base_revision: transaction.base_revision().to_string(),
        message,
        files,
    })
}
