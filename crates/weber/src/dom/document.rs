// ABOUTME: Parsed HTML document holding both the raw markup and the scraper tree.
// ABOUTME: Chooses document or fragment parsing and answers exact-text element lookups.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

use super::node::immediate_text;

// Markup that carries its own document scaffolding is parsed as a full document.
static DOCUMENT_MARKERS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<!doctype|<(?:html|head|body)[\s>/]").unwrap());

/// An immutable parsed document.
#[derive(Debug)]
pub struct Document {
    raw: String,
    html: Html,
}

impl Document {
    /// Parse raw markup.
    ///
    /// Bare fragments are parsed in fragment mode, so their top-level elements share
    /// no wrapper besides the synthetic root element.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let html = if DOCUMENT_MARKERS_RE.is_match(&raw) {
            Html::parse_document(&raw)
        } else {
            Html::parse_fragment(&raw)
        };
        Self { raw, html }
    }

    /// The markup this document was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// All elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }

    /// Elements whose immediate text equals `text` exactly, in document order.
    pub fn find_text(&self, text: &str) -> Vec<ElementRef<'_>> {
        self.elements()
            .filter(|el| immediate_text(*el) == text)
            .collect()
    }

    /// Like [`Document::find_text`], restricted to elements named `tag`.
    pub fn find_tag_text(&self, tag: &str, text: &str) -> Vec<ElementRef<'_>> {
        self.elements()
            .filter(|el| el.value().name().eq_ignore_ascii_case(tag))
            .filter(|el| immediate_text(*el) == text)
            .collect()
    }
}
