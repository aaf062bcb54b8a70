// ABOUTME: Document model built on scraper's HTML tree.
// ABOUTME: Exposes node classification, text lookup, ancestor chains and shape signatures.

//! Document model for structure inference.
//!
//! The tree comes from `scraper` (html5ever + `ego-tree`) and is never mutated
//! after parse. Every traversal site classifies nodes through [`DomNode`];
//! whitespace-only text is skipped wherever children are compared or counted.

mod document;
mod node;
mod shape;

pub use document::Document;
pub use node::{element_children, immediate_text, structural_children, DomNode};
pub use shape::{ancestor_chain, shape_signature};
