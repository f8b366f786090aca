//! Synchronization core: everything that does not talk to the network.
//!
//! - `key_generator`: translation key suggestions
//! - `extract`: text discovery over the document node tree
//! - `table`: translation tables, their YAML format and merge
//! - `index`: searchable index of published keys

pub mod extract;
pub mod index;
pub mod key_generator;
pub mod table;

pub use extract::{Node, TextUnit, extract_text_units, find_node, find_node_mut};
pub use index::{KeyIndex, KeyMatch, KeyTranslations, SEARCH_RESULT_LIMIT};
pub use key_generator::suggest_key;
pub use table::{
    KeyAction, MergeStats, TranslationTable, merge_tables, parse_table, parse_table_exact,
    serialize_table,
};
