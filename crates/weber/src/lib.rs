// ABOUTME: Main library entry point for weber, the HTML structure inference engine.
// ABOUTME: Re-exports the public API: Weber, WeberBuilder, Schema, WeberError, ErrorCode, Options.

//! Weber - infer a reusable structural template from an HTML document.
//!
//! Given a few literal text snippets ("anchors") known to appear in a page,
//! weber finds the element holding each one, climbs their ancestor chains to
//! the shallowest shape they all share, and describes that shape as a
//! [`Schema`]: tag names, common attribute tokens and positional children.
//!
//! # Example
//!
//! ```
//! use weber::{Weber, WeberError};
//!
//! fn main() -> Result<(), WeberError> {
//!     let mut weber = Weber::builder().build();
//!     weber.load_html_str(
//!         r#"<div class="a b"><p>Foo</p></div><div class="a c"><p>Bar</p></div>"#,
//!         "inline.html",
//!     );
//!     weber.add_anchor("Foo");
//!     weber.add_anchor("Bar");
//!     let schema = weber.derive_structure()?;
//!     assert_eq!(schema.name, "div");
//!     Ok(())
//! }
//! ```

pub mod align;
pub mod anchors;
pub mod dom;
pub mod error;
pub mod formats;
pub mod locate;
pub mod options;
pub mod resource;
pub mod schema;
pub mod synthesize;
pub mod weber;

pub use crate::align::{align, Alignment};
pub use crate::anchors::AnchorSet;
pub use crate::dom::Document;
pub use crate::error::{ErrorCode, Result, WeberError};
pub use crate::formats::{json_output_path, render_code, to_json_pretty, CodeTarget};
pub use crate::locate::{locate, AnchorMatch};
pub use crate::options::{
    ChildArity, LoadOptions, LocateStrategy, Options, SynthesisOptions, WeberBuilder,
};
pub use crate::schema::Schema;
pub use crate::synthesize::synthesize;
pub use crate::weber::{infer, Weber};
