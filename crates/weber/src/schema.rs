// ABOUTME: Schema record describing an inferred structural template.
// ABOUTME: Serializes to the JSON shape {name, attrs?, children?}.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A generalized template node: tag name, shared attribute tokens, positional children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Schema>>,
}

impl Schema {
    /// A bare node with only a tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: None,
            children: None,
        }
    }

    /// Tokens kept for `attr`, if any.
    pub fn attr(&self, attr: &str) -> Option<&[String]> {
        self.attrs
            .as_ref()
            .and_then(|attrs| attrs.get(attr))
            .map(Vec::as_slice)
    }

    pub fn children(&self) -> &[Schema] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Number of nodes in this schema tree, root included.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Schema::node_count).sum::<usize>()
    }
}
