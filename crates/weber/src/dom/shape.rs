// ABOUTME: Ancestor chains and canonical tag-tree shape signatures.
// ABOUTME: Signatures ignore attributes and text so equal strings mean interchangeable shapes.

use scraper::ElementRef;

use super::node::element_children;

/// Strict ancestors of `el`, nearest first, stopping below the root element.
///
/// The root element (`<html>`) wraps everything in the document, so it is never
/// a meaningful shared shape and is left out.
pub fn ancestor_chain(el: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut chain = Vec::new();
    let mut current = el.parent().and_then(ElementRef::wrap);
    while let Some(parent) = current {
        let grandparent = parent.parent().and_then(ElementRef::wrap);
        if grandparent.is_none() {
            break;
        }
        chain.push(parent);
        current = grandparent;
    }
    chain
}

/// Canonical encoding of an element's tag tree: `tag(` + child signatures + `)`.
pub fn shape_signature(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    write_signature(el, &mut out);
    out
}

fn write_signature(el: ElementRef<'_>, out: &mut String) {
    out.push_str(el.value().name());
    out.push('(');
    for child in element_children(el) {
        write_signature(child, out);
    }
    out.push(')');
}
