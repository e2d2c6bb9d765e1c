//! Element tree: slotmap-backed arena for display file fragments.
//!
//! The loader reads display files into a [`Document`], lets configurators
//! inspect and restructure it, and builds widgets from the result. The
//! writer produces a fresh [`Document`] from a widget tree.

pub mod node;
pub mod query;
pub mod tree;
pub mod xml;

pub use node::{ElementData, ElementId};
pub use query::QueryError;
pub use tree::Document;

/// Tag of a widget fragment.
pub const WIDGET_TAG: &str = "widget";

/// Tag of the display root.
pub const DISPLAY_TAG: &str = "display";

/// Errors raised while converting between XML text and a [`Document`].
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("I/O error while writing XML: {0}")]
    Io(#[from] std::io::Error),
    #[error("document has no root element")]
    MissingRoot,
    #[error("second root element <{0}>")]
    MultipleRoots(String),
    #[error("element <{0}> is never closed")]
    Unclosed(String),
    #[error("written XML is not UTF-8: {0}")]
    Encoding(String),
}
