//! Translation tables and their YAML file format.
//!
//! A table is a flat key→string mapping for one language. On disk it is a
//! YAML mapping with keys sorted lexicographically, one entry per line,
//! values double-quoted only when a plain scalar would be ambiguous.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::error::SyncError;

/// One language's key→value mapping. Iteration order is sorted by key.
pub type TranslationTable = BTreeMap<String, String>;

/// Words a YAML parser may read as booleans, nulls or special floats.
const RESERVED_WORDS: &[&str] = &[
    "true", "false", "yes", "no", "y", "n", "on", "off", "null", "nan", "inf", "infinity",
];

/// Longer keys are written in explicit `? key` form; YAML caps implicit keys
/// at 1024 characters.
const MAX_IMPLICIT_KEY_LEN: usize = 1000;

/// Parse a serialized table. `path` is only used in diagnostics.
///
/// Scalar values (numbers, booleans) are read as their string form; nested
/// values and nulls are skipped with a warning. A document that is not a
/// mapping is malformed.
pub fn parse_table(content: &str, path: &str) -> Result<TranslationTable, SyncError> {
    let mut table = TranslationTable::new();
    for (key, value) in read_mapping(content, path)? {
        let Some(key) = scalar_to_string(&key) else {
            warn!(path, key = ?key, "Skipping entry with non-scalar key");
            continue;
        };
        match scalar_to_string(&value) {
            Some(value) => {
                table.insert(key, value);
            }
            None => warn!(
                path,
                key = %key,
                kind = value_kind(&value),
                "Skipping entry without a string value"
            ),
        }
    }
    Ok(table)
}

/// Parse a table that is about to be rewritten.
///
/// Every entry must be a string key with a string value. Anything else would
/// be dropped or reformatted by the rewrite, so the file is malformed.
pub fn parse_table_exact(content: &str, path: &str) -> Result<TranslationTable, SyncError> {
    let mut table = TranslationTable::new();
    for (key, value) in read_mapping(content, path)? {
        let Value::String(key) = key else {
            return Err(SyncError::malformed(
                path,
                format!("key {} is a {}, not a string", describe(&key), value_kind(&key)),
            ));
        };
        let Value::String(value) = value else {
            return Err(SyncError::malformed(
                path,
                format!(
                    "value of `{}` is a {}; quote it or remove the entry",
                    key,
                    value_kind(&value)
                ),
            ));
        };
        table.insert(key, value);
    }
    Ok(table)
}

fn read_mapping(content: &str, path: &str) -> Result<Mapping, SyncError> {
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let document: Value =
        serde_yaml::from_str(content).map_err(|e| SyncError::malformed(path, e))?;

    match document {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(SyncError::malformed(
            path,
            format!("expected a mapping, found {}", value_kind(&other)),
        )),
    }
}

fn describe(value: &Value) -> String {
    scalar_to_string(value).unwrap_or_else(|| value_kind(value).to_string())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Serialize a table with sorted keys and no line wrapping.
pub fn serialize_table(table: &TranslationTable) -> String {
    if table.is_empty() {
        return "{}\n".to_string();
    }

    let mut out = String::new();
    for (key, value) in table {
        let key = scalar(key);
        if key.len() > MAX_IMPLICIT_KEY_LEN {
            out.push_str("? ");
            out.push_str(&key);
            out.push_str("\n: ");
        } else {
            out.push_str(&key);
            out.push_str(": ");
        }
        out.push_str(&scalar(value));
        out.push('\n');
    }
    out
}

fn scalar(s: &str) -> String {
    if needs_quotes(s) {
        double_quoted(s)
    } else {
        s.to_string()
    }
}

fn needs_quotes(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };
    if !(first.is_alphabetic() || first == '_') {
        return true;
    }
    if s.ends_with(char::is_whitespace) {
        return true;
    }
    if s.chars().any(|c| needs_escape(c) || matches!(c, ':' | '#' | '"' | '\\')) {
        return true;
    }
    let lower = s.to_lowercase();
    RESERVED_WORDS.contains(&lower.as_str())
}

/// Characters outside YAML's printable set, plus line breaks and the byte
/// order mark.
fn needs_escape(c: char) -> bool {
    let printable = matches!(
        c,
        '\u{20}'..='\u{7e}'
            | '\u{a0}'..='\u{d7ff}'
            | '\u{e000}'..='\u{fffd}'
            | '\u{10000}'..='\u{10ffff}'
    );
    !printable || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}')
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c if needs_escape(c) => {
                let code = c as u32;
                if code <= 0xff {
                    out.push_str(&format!("\\x{:02X}", code));
                } else if code <= 0xffff {
                    out.push_str(&format!("\\u{:04X}", code));
                } else {
                    out.push_str(&format!("\\U{:08X}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Whether a key was new or replaced an existing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Added,
    Updated,
    Unchanged,
}

impl KeyAction {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyAction::Added => "added",
            KeyAction::Updated => "updated",
            KeyAction::Unchanged => "unchanged",
        }
    }
}

/// Counts of what a merge did to the base table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl MergeStats {
    pub fn record(&mut self, action: KeyAction) {
        match action {
            KeyAction::Added => self.added += 1,
            KeyAction::Updated => self.updated += 1,
            KeyAction::Unchanged => self.unchanged += 1,
        }
    }

    pub fn changed(&self) -> bool {
        self.added + self.updated > 0
    }
}

/// Shallow overwrite merge: candidate values win, keys absent from the
/// candidate are kept.
pub fn merge_tables(
    current: &TranslationTable,
    candidate: &TranslationTable,
) -> (TranslationTable, MergeStats) {
    let mut merged = current.clone();
    let mut stats = MergeStats::default();
    for (key, value) in candidate {
        let action = match merged.insert(key.clone(), value.clone()) {
            None => KeyAction::Added,
            Some(previous) if previous == *value => KeyAction::Unchanged,
            Some(_) => KeyAction::Updated,
        };
        stats.record(action);
    }
    (merged, stats)
}
