//! Text discovery over a design document's node tree.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::key_generator::suggest_key;

/// One node of the host document.
///
/// A node with `characters` is a text node; a node with `children` is a
/// container. Fields the engine does not use are kept in `extra` so a
/// document can be written back unchanged apart from renames.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn text(id: &str, name: &str, characters: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            characters: Some(characters.to_string()),
            ..Default::default()
        }
    }

    pub fn container(id: &str, name: &str, children: Vec<Node>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            children,
            ..Default::default()
        }
    }

    pub fn is_text(&self) -> bool {
        self.characters.is_some()
    }
}

/// A piece of translatable text found in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextUnit {
    pub id: String,
    pub text: String,
    pub label_name: String,
    pub suggested_key: String,
}

/// Collect text units in depth-first document order.
///
/// Traversal uses an explicit stack, so nesting depth is bounded only by memory.
pub fn extract_text_units(roots: &[Node]) -> Vec<TextUnit> {
    let mut units = Vec::new();
    let mut stack = vec![roots.iter()];

    while let Some(siblings) = stack.last_mut() {
        let Some(node) = siblings.next() else {
            stack.pop();
            continue;
        };

        if let Some(unit) = text_unit(node) {
            units.push(unit);
        }
        if !node.children.is_empty() {
            stack.push(node.children.iter());
        }
    }

    units
}

fn text_unit(node: &Node) -> Option<TextUnit> {
    let text = node.characters.as_deref()?.trim();
    if !is_translatable(text) {
        return None;
    }
    Some(TextUnit {
        id: node.id.clone(),
        text: text.to_string(),
        label_name: node.name.clone(),
        suggested_key: suggest_key(&node.name, text),
    })
}

/// Non-empty and not made of digits only.
fn is_translatable(text: &str) -> bool {
    !text.is_empty() && !text.chars().all(|c| c.is_ascii_digit())
}

/// Find a node by id anywhere in the forest.
pub fn find_node<'a>(roots: &'a [Node], id: &str) -> Option<&'a Node> {
    let mut stack: Vec<&Node> = roots.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.id == id {
            return Some(node);
        }
        stack.extend(node.children.iter().rev());
    }
    None
}

/// Find a node by id for modification.
pub fn find_node_mut<'a>(roots: &'a mut [Node], id: &str) -> Option<&'a mut Node> {
    let mut stack: Vec<&mut Node> = roots.iter_mut().rev().collect();
    while let Some(node) = stack.pop() {
        if node.id == id {
            return Some(node);
        }
        stack.extend(node.children.iter_mut().rev());
    }
    None
}
