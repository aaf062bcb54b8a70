// ABOUTME: Anchor locator resolving literal anchor strings to their enclosing elements.
// ABOUTME: Supports a direct tree query and a raw-markup tag scan re-resolved through the tree.

//! Anchor localization.
//!
//! Each anchor resolves to the first element (document order) whose immediate
//! text equals it. Results are keyed by element: an anchor resolving to an
//! element already claimed relabels that entry instead of adding a new one.

use regex::Regex;
use scraper::ElementRef;
use tracing::debug;

use crate::dom::Document;
use crate::error::{Result, WeberError};
use crate::options::LocateStrategy;

/// An anchor paired with the element holding it.
#[derive(Debug, Clone)]
pub struct AnchorMatch<'a> {
    pub anchor: String,
    pub element: ElementRef<'a>,
}

/// Resolve every anchor, failing fast on the first one without a match.
pub fn locate<'a, S: AsRef<str>>(
    doc: &'a Document,
    anchors: &[S],
    strategy: LocateStrategy,
) -> Result<Vec<AnchorMatch<'a>>> {
    let mut matches: Vec<AnchorMatch<'a>> = Vec::with_capacity(anchors.len());

    for anchor in anchors {
        let anchor = anchor.as_ref();
        let element = match strategy {
            LocateStrategy::TreeQuery => locate_by_tree(doc, anchor),
            LocateStrategy::TagScan => locate_by_tag_scan(doc, anchor),
        }
        .ok_or_else(|| WeberError::no_match(anchor, "Locate"))?;

        debug!(anchor, tag = element.value().name(), %strategy, "anchor located");

        match matches.iter_mut().find(|m| m.element.id() == element.id()) {
            Some(existing) => existing.anchor = anchor.to_string(),
            None => matches.push(AnchorMatch {
                anchor: anchor.to_string(),
                element,
            }),
        }
    }

    Ok(matches)
}

fn locate_by_tree<'a>(doc: &'a Document, anchor: &str) -> Option<ElementRef<'a>> {
    if anchor.is_empty() {
        return None;
    }
    doc.find_text(anchor).into_iter().next()
}

fn locate_by_tag_scan<'a>(doc: &'a Document, anchor: &str) -> Option<ElementRef<'a>> {
    if anchor.is_empty() {
        return None;
    }
    let escaped = escape_html_text(anchor);
    let mut forms = vec![anchor];
    if escaped != anchor {
        forms.push(escaped.as_str());
    }
    // Hits inside comments or scripts never resolve in the tree; keep scanning.
    forms.into_iter().find_map(|form| {
        wrapping_tags(doc.raw(), form)
            .into_iter()
            .find_map(|tag| doc.find_tag_text(&tag, anchor).into_iter().next())
    })
}

/// Names of the tags in `raw` that wrap exactly `anchor`, e.g. `<td class="x">anchor</td>`,
/// in markup order.
fn wrapping_tags(raw: &str, anchor: &str) -> Vec<String> {
    let pattern = format!(
        r"<([A-Za-z][A-Za-z0-9:-]*)(?:\s[^<>]*)?>{}</[^<>]*>",
        regex::escape(anchor)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };
    re.captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect()
}

/// The form text takes in markup when its special characters are written as entities.
fn escape_html_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
