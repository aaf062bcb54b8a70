// ABOUTME: Ordered anchor list fed by single additions or newline-delimited files.
// ABOUTME: Blank lines are kept as anchors unless the caller filters them explicitly.

use std::fs;
use std::path::Path;

use crate::error::{Result, WeberError};

/// The literal text snippets used to seed inference, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorSet {
    anchors: Vec<String>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, anchor: impl Into<String>) {
        self.anchors.push(anchor.into());
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    /// Append one anchor per `\n`-delimited line of `text`.
    ///
    /// A trailing newline yields a final empty anchor, which will fail to locate
    /// unless removed with [`AnchorSet::retain_non_empty`].
    pub fn extend_from_lines(&mut self, text: &str) {
        for line in text.split('\n') {
            self.add(line.strip_suffix('\r').unwrap_or(line));
        }
    }

    /// Append the lines of the file at `path`.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            WeberError::load(
                path.display().to_string(),
                "LoadAnchors",
                Some(anyhow::Error::new(e)),
            )
        })?;
        self.extend_from_lines(&text);
        Ok(())
    }

    /// Drop anchors that are empty or whitespace only.
    pub fn retain_non_empty(&mut self) {
        self.anchors.retain(|anchor| !anchor.trim().is_empty());
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.anchors.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.anchors
    }
}

impl<S: Into<String>> FromIterator<S> for AnchorSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            anchors: iter.into_iter().map(Into::into).collect(),
        }
    }
}
