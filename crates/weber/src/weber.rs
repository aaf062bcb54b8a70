// ABOUTME: The Weber session: owns one loaded document and its anchors, runs the inference pipeline.
// ABOUTME: Provides derive_structure() plus JSON and scraping-code writers.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::align::align;
use crate::anchors::AnchorSet;
use crate::dom::Document;
use crate::error::{Result, WeberError};
use crate::formats::{json_output_path, render_code, to_json_pretty, CodeTarget};
use crate::locate::locate;
use crate::options::{Options, WeberBuilder};
use crate::resource::load_source;
use crate::schema::Schema;

/// Run the full pipeline (locate, align, synthesize) over a parsed document.
pub fn infer<S: AsRef<str>>(doc: &Document, anchors: &[S], opts: &Options) -> Result<Schema> {
    let matches = locate(doc, anchors, opts.locate)?;
    let alignment = align(&matches)?;
    debug!(
        depth = alignment.depth,
        signature = %alignment.signature,
        "synthesizing from aligned nodes"
    );
    crate::synthesize::synthesize(&alignment.nodes, &opts.synthesis)
}

/// An inference session over one document.
#[derive(Debug, Default)]
pub struct Weber {
    opts: Options,
    source: Option<String>,
    document: Option<Document>,
    anchors: AnchorSet,
}

impl Weber {
    /// Create a new WeberBuilder.
    pub fn builder() -> WeberBuilder {
        WeberBuilder::new()
    }

    pub fn new(opts: Options) -> Self {
        Self {
            opts,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Load a document from a URL or local path. Previously added anchors are cleared.
    pub fn load_html(&mut self, source: &str) -> Result<()> {
        let loaded = load_source(source, &self.opts.load)?;
        info!(source, bytes = loaded.text.len(), "document loaded");
        self.set_document(loaded.text, source);
        Ok(())
    }

    /// Use already-fetched markup. `source` is only used as a label in generated code.
    pub fn load_html_str(&mut self, raw: impl Into<String>, source: &str) {
        self.set_document(raw.into(), source);
    }

    fn set_document(&mut self, raw: String, source: &str) {
        self.document = Some(Document::parse(raw));
        self.source = Some(source.to_string());
        self.anchors.clear();
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn add_anchor(&mut self, anchor: impl Into<String>) {
        self.anchors.add(anchor);
    }

    /// Add one anchor per line of the file at `path`.
    pub fn load_anchors_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.anchors.load_file(path)
    }

    pub fn clear_anchors(&mut self) {
        self.anchors.clear();
    }

    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    pub fn anchors_mut(&mut self) -> &mut AnchorSet {
        &mut self.anchors
    }

    /// Infer the structure shared by all anchors.
    pub fn derive_structure(&self) -> Result<Schema> {
        let doc = self.require_document("DeriveStructure")?;
        infer(doc, self.anchors.as_slice(), &self.opts)
    }

    /// Write the schema as JSON; the written path always ends in `.json`.
    pub fn write_structure_to_json(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let schema = self.derive_structure()?;
        let path = json_output_path(path);
        let json = to_json_pretty(&schema)?;
        write_file(&path, &json)?;
        info!(path = %path.display(), nodes = schema.node_count(), "schema written");
        Ok(path)
    }

    /// Write a script that re-selects the schema's nodes from the same source.
    pub fn generate_scraping_code(&self, path: impl AsRef<Path>, target: CodeTarget) -> Result<()> {
        let schema = self.derive_structure()?;
        let source = self.source.as_deref().unwrap_or_default();
        let code = render_code(&schema, source, target);
        let path = path.as_ref();
        write_file(path, &code)?;
        info!(path = %path.display(), %target, "scraping code written");
        Ok(())
    }

    fn require_document(&self, op: &str) -> Result<&Document> {
        self.document.as_ref().ok_or_else(|| {
            WeberError::load("", op, Some(anyhow::anyhow!("no document loaded")))
        })
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| {
        WeberError::write(
            path.display().to_string(),
            "WriteFile",
            Some(anyhow::Error::new(e)),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ChildArity;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const CARDS: &str = r#"<div class="a b"><p>Foo</p></div><div class="a c"><p>Bar</p></div>"#;

    #[test]
    fn derive_without_document_is_load_error() {
        let mut weber = Weber::builder().build();
        weber.add_anchor("Foo");
        let err = weber.derive_structure().unwrap_err();
        assert!(err.is_load());
    }

    #[test]
    fn loading_resets_anchors() {
        let mut weber = Weber::builder().build();
        weber.add_anchor("stale");
        weber.load_html_str(CARDS, "cards.html");
        assert!(weber.anchors().is_empty());
        assert_eq!(weber.source(), Some("cards.html"));
    }

    #[test]
    fn derive_structure_from_anchors() {
        let mut weber = Weber::builder().build();
        weber.load_html_str(CARDS, "cards.html");
        weber.add_anchor("Foo");
        weber.add_anchor("Bar");
        let schema = weber.derive_structure().unwrap();
        assert_eq!(schema.name, "div");
        assert_eq!(schema.attr("class"), Some(&["a".to_string()][..]));
    }

    #[test]
    fn no_anchors_is_no_convergence() {
        let mut weber = Weber::builder().build();
        weber.load_html_str(CARDS, "cards.html");
        assert!(weber.derive_structure().unwrap_err().is_no_convergence());
    }

    #[test]
    fn write_json_renames_extension() {
        let dir = TempDir::new().unwrap();
        let mut weber = Weber::builder().build();
        weber.load_html_str(CARDS, "cards.html");
        weber.add_anchor("Foo");
        weber.add_anchor("Bar");

        let written = weber
            .write_structure_to_json(dir.path().join("schema.txt"))
            .unwrap();
        assert_eq!(written, dir.path().join("schema.json"));
        let back: Schema = serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
        assert_eq!(back, weber.derive_structure().unwrap());
    }

    #[test]
    fn generate_code_writes_target() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("scrape.py");
        let mut weber = Weber::builder().child_arity(ChildArity::Strict).build();
        weber.load_html_str(CARDS, "cards.html");
        weber.add_anchor("Foo");
        weber.add_anchor("Bar");
        weber
            .generate_scraping_code(&out, CodeTarget::BeautifulSoup)
            .unwrap();
        let code = fs::read_to_string(&out).unwrap();
        assert!(code.contains("html.select(\"div.a\")"));
        assert!(code.contains("open(\"cards.html\")"));
    }
}
