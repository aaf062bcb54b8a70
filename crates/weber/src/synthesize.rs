// ABOUTME: Structure synthesizer turning aligned nodes into a recursive Schema.
// ABOUTME: Intersects configured attribute tokens and zips element children positionally.

//! Schema synthesis.
//!
//! All aligned nodes are assumed to share the first node's tag name; the
//! aligner guarantees it through shape signatures and it is not re-checked.
//! Only attributes listed in [`SynthesisOptions::retrieve_attrs`] are
//! considered, each treated as a whitespace-separated token set.

use std::collections::{BTreeMap, BTreeSet};

use scraper::ElementRef;
use tracing::warn;

use crate::dom::element_children;
use crate::error::{Result, WeberError};
use crate::options::{ChildArity, SynthesisOptions};
use crate::schema::Schema;

/// Build the schema shared by `nodes`.
pub fn synthesize(nodes: &[ElementRef<'_>], opts: &SynthesisOptions) -> Result<Schema> {
    let Some(first) = nodes.first() else {
        return Err(WeberError::no_convergence(
            "",
            "Synthesize",
            Some(anyhow::anyhow!("no aligned nodes to synthesize")),
        ));
    };

    let mut schema = Schema::new(first.value().name());

    let attrs: BTreeMap<String, Vec<String>> = opts
        .retrieve_attrs
        .iter()
        .filter_map(|attr| {
            let common = intersect_attr(nodes, attr)?;
            if common.is_empty() {
                return None;
            }
            Some((attr.clone(), common.into_iter().map(str::to_string).collect()))
        })
        .collect();
    if !attrs.is_empty() {
        schema.attrs = Some(attrs);
    }

    let lists: Vec<Vec<ElementRef<'_>>> = nodes
        .iter()
        .map(|node| element_children(*node).collect())
        .collect();
    if lists.iter().all(Vec::is_empty) {
        return Ok(schema);
    }

    let children = group_children(&schema.name, lists, opts.child_arity)?
        .iter()
        .map(|group| synthesize(group, opts))
        .collect::<Result<Vec<_>>>()?;
    if !children.is_empty() {
        schema.children = Some(children);
    }

    Ok(schema)
}

/// Tokens of `attr` common to every node; `None` when some node lacks the attribute.
fn intersect_attr<'a>(nodes: &[ElementRef<'a>], attr: &str) -> Option<BTreeSet<&'a str>> {
    let mut values = nodes.iter().map(|node| node.value().attr(attr));
    let mut common: BTreeSet<&str> = values.next()??.split_whitespace().collect();
    for value in values {
        let tokens: BTreeSet<&str> = value?.split_whitespace().collect();
        common.retain(|token| tokens.contains(token));
    }
    Some(common)
}

/// Positional groups of element children, one group per child index.
fn group_children<'a>(
    tag: &str,
    lists: Vec<Vec<ElementRef<'a>>>,
    arity: ChildArity,
) -> Result<Vec<Vec<ElementRef<'a>>>> {
    let counts: Vec<usize> = lists.iter().map(Vec::len).collect();
    let uneven = counts.windows(2).any(|pair| pair[0] != pair[1]);

    if uneven && arity == ChildArity::Strict {
        return Err(WeberError::child_arity_mismatch(
            tag,
            "Synthesize",
            Some(anyhow::anyhow!("element child counts differ: {:?}", counts)),
        ));
    }

    // Nodes without element children sit out; the rest are cut to the shortest list.
    let lists: Vec<Vec<ElementRef<'a>>> = lists.into_iter().filter(|l| !l.is_empty()).collect();
    let width = lists.iter().map(Vec::len).min().unwrap_or(0);

    if uneven {
        let dropped: usize = lists.iter().map(|l| l.len() - width).sum();
        warn!(tag, ?counts, width, dropped, "child counts differ; truncating to shortest");
    }

    Ok((0..width)
        .map(|i| lists.iter().map(|list| list[i]).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use pretty_assertions::assert_eq;

    fn named<'a>(doc: &'a Document, tag: &str) -> Vec<ElementRef<'a>> {
        doc.elements()
            .filter(|el| el.value().name() == tag)
            .collect()
    }

    fn class_of(schema: &Schema) -> BTreeSet<String> {
        schema
            .attr("class")
            .unwrap_or(&[])
            .iter()
            .cloned()
            .collect()
    }

    #[test]
    fn intersects_classes_and_recurses() {
        let doc = Document::parse(
            r#"<div class="a b"><p>Foo</p></div><div class="a c"><p>Bar</p></div>"#,
        );
        let schema = synthesize(&named(&doc, "div"), &SynthesisOptions::default()).unwrap();
        let expected: Schema = serde_json::from_str(
            r#"{"name":"div","attrs":{"class":["a"]},"children":[{"name":"p"}]}"#,
        )
        .unwrap();
        assert_eq!(schema, expected);
    }

    #[test]
    fn class_intersection_ignores_node_order() {
        let doc = Document::parse(
            r#"<li class="x y z">1</li><li class="z y">2</li><li class="y q z">3</li>"#,
        );
        let mut nodes = named(&doc, "li");
        let forward = synthesize(&nodes, &SynthesisOptions::default()).unwrap();
        nodes.reverse();
        let backward = synthesize(&nodes, &SynthesisOptions::default()).unwrap();
        nodes.swap(0, 1);
        let shuffled = synthesize(&nodes, &SynthesisOptions::default()).unwrap();

        let expected: BTreeSet<String> = ["y", "z"].iter().map(|s| s.to_string()).collect();
        assert_eq!(class_of(&forward), expected);
        assert_eq!(class_of(&backward), expected);
        assert_eq!(class_of(&shuffled), expected);
    }

    #[test]
    fn attribute_missing_on_one_node_is_dropped() {
        let doc = Document::parse(r#"<span class="a">1</span><span>2</span>"#);
        let schema = synthesize(&named(&doc, "span"), &SynthesisOptions::default()).unwrap();
        assert_eq!(schema, Schema::new("span"));
    }

    #[test]
    fn disjoint_classes_leave_no_attrs() {
        let doc = Document::parse(r#"<span class="a">1</span><span class="b">2</span>"#);
        let schema = synthesize(&named(&doc, "span"), &SynthesisOptions::default()).unwrap();
        assert!(schema.attrs.is_none());
    }

    #[test]
    fn only_configured_attributes_are_retrieved() {
        let doc = Document::parse(
            r#"<a class="nav" rel="next nofollow" id="x">1</a><a class="nav" rel="nofollow" id="y">2</a>"#,
        );
        let nodes = named(&doc, "a");

        let schema = synthesize(&nodes, &SynthesisOptions::default()).unwrap();
        assert_eq!(schema.attrs.as_ref().map(BTreeMap::len), Some(1));

        let opts = SynthesisOptions {
            retrieve_attrs: ["rel", "id"].iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let schema = synthesize(&nodes, &opts).unwrap();
        assert_eq!(schema.attr("rel"), Some(&["nofollow".to_string()][..]));
        assert_eq!(schema.attr("id"), None);
        assert_eq!(schema.attr("class"), None);
    }

    #[test]
    fn text_children_are_not_structure() {
        let doc = Document::parse("<p>plain text</p><p>more</p>");
        let schema = synthesize(&named(&doc, "p"), &SynthesisOptions::default()).unwrap();
        assert!(schema.children.is_none());
    }

    #[test]
    fn truncates_to_shortest_child_list() {
        let doc = Document::parse(
            "<ul><li>a</li><li>b</li><li>c</li></ul><ul><li>d</li><li>e</li></ul>",
        );
        let schema = synthesize(&named(&doc, "ul"), &SynthesisOptions::default()).unwrap();
        assert_eq!(schema.children().len(), 2);
        assert!(schema.children().iter().all(|c| c.name == "li"));
    }

    #[test]
    fn childless_nodes_sit_out_of_grouping() {
        let doc = Document::parse("<div><p>a</p></div><div>text only</div>");
        let schema = synthesize(&named(&doc, "div"), &SynthesisOptions::default()).unwrap();
        assert_eq!(schema.children(), &[Schema::new("p")]);
    }

    #[test]
    fn strict_mode_rejects_uneven_children() {
        let doc = Document::parse(
            "<ul><li>a</li><li>b</li><li>c</li></ul><ul><li>d</li><li>e</li></ul>",
        );
        let opts = SynthesisOptions {
            child_arity: ChildArity::Strict,
            ..Default::default()
        };
        let err = synthesize(&named(&doc, "ul"), &opts).unwrap_err();
        assert!(err.is_child_arity_mismatch());
        assert_eq!(err.subject, "ul");
    }

    #[test]
    fn strict_mode_accepts_even_children() {
        let doc = Document::parse("<ul><li>a</li></ul><ul><li>d</li></ul>");
        let opts = SynthesisOptions {
            child_arity: ChildArity::Strict,
            ..Default::default()
        };
        let schema = synthesize(&named(&doc, "ul"), &opts).unwrap();
        assert_eq!(schema.node_count(), 2);
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = synthesize(&[], &SynthesisOptions::default()).unwrap_err();
        assert!(err.is_no_convergence());
    }
}
