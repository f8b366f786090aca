//! In-memory index of published keys and their per-language values.

use indexmap::IndexMap;
use serde::Serialize;

use super::table::TranslationTable;
use crate::config::LanguageCode;

/// Maximum number of matches returned by a search.
pub const SEARCH_RESULT_LIMIT: usize = 10;

/// Values of one key, by language code.
pub type KeyTranslations = IndexMap<LanguageCode, String>;

/// Union of all languages' tables, keyed by translation key.
///
/// Iteration order is insertion order: keys appear in the order their first
/// language table listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyIndex {
    entries: IndexMap<String, KeyTranslations>,
}

/// One search hit, with the slots that matched for highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMatch {
    pub key: String,
    pub translations: KeyTranslations,
    /// The query matched the key itself.
    pub key_matched: bool,
    /// Languages whose value matched, in the order searched.
    pub matched_languages: Vec<LanguageCode>,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from per-language tables.
    pub fn from_tables<'a, I>(tables: I) -> Self
    where
        I: IntoIterator<Item = (&'a LanguageCode, &'a TranslationTable)>,
    {
        let mut index = Self::new();
        for (language, table) in tables {
            index.merge_table(language, table);
        }
        index
    }

    /// Add every entry of one language's table. Existing values for that language are replaced.
    pub fn merge_table(&mut self, language: &str, table: &TranslationTable) {
        for (key, value) in table {
            self.insert(key, language, value);
        }
    }

    pub fn insert(&mut self, key: &str, language: &str, value: &str) {
        self.entries
            .entry(key.to_string())
            .or_default()
            .insert(language.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&KeyTranslations> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &KeyTranslations)> {
        self.entries.iter()
    }

    /// Case-insensitive substring search over keys and the values of `languages`.
    ///
    /// Matches come back in index order, capped at [`SEARCH_RESULT_LIMIT`].
    /// An empty query matches nothing.
    pub fn search(&self, query: &str, languages: &[LanguageCode]) -> Vec<KeyMatch> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        self.entries
            .iter()
            .filter_map(|(key, translations)| {
                let key_matched = key.to_lowercase().contains(&needle);
                let matched_languages: Vec<LanguageCode> = languages
                    .iter()
                    .filter(|language| {
                        translations
                            .get(language.as_str())
                            .is_some_and(|value| value.to_lowercase().contains(&needle))
                    })
                    .cloned()
                    .collect();

                (key_matched || !matched_languages.is_empty()).then(|| KeyMatch {
                    key: key.clone(),
                    translations: translations.clone(),
                    key_matched,
                    matched_languages,
                })
            })
            .take(SEARCH_RESULT_LIMIT)
            .collect()
    }
}
