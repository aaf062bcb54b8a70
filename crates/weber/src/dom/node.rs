// ABOUTME: Explicit node classification over scraper's tree (element, text, other).
// ABOUTME: Child iteration helpers that drop whitespace-only text and non-content nodes.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

/// A tree node as seen by the inference pipeline.
#[derive(Debug, Clone, Copy)]
pub enum DomNode<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
    /// Comments, doctypes, processing instructions and document roots.
    Other,
}

impl<'a> DomNode<'a> {
    pub fn classify(node: NodeRef<'a, Node>) -> Self {
        match node.value() {
            Node::Element(_) => match ElementRef::wrap(node) {
                Some(el) => DomNode::Element(el),
                None => DomNode::Other,
            },
            Node::Text(text) => DomNode::Text(&**text),
            _ => DomNode::Other,
        }
    }

    /// True for text nodes made only of whitespace (indentation, newlines).
    pub(crate) fn is_blank_text(&self) -> bool {
        matches!(self, DomNode::Text(text) if text.trim().is_empty())
    }
}

/// Children that carry structure or content: elements and non-blank text.
pub fn structural_children<'a>(el: ElementRef<'a>) -> impl Iterator<Item = DomNode<'a>> {
    el.children()
        .map(DomNode::classify)
        .filter(|node| !matches!(node, DomNode::Other) && !node.is_blank_text())
}

/// Element children only, in document order.
pub fn element_children<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    structural_children(el).filter_map(|child| match child {
        DomNode::Element(child) => Some(child),
        _ => None,
    })
}

/// Concatenation of the element's direct text children (descendants excluded).
pub fn immediate_text(el: ElementRef<'_>) -> String {
    el.children()
        .filter_map(|child| match DomNode::classify(child) {
            DomNode::Text(text) => Some(text),
            _ => None,
        })
        .collect()
}
