//! Loading and writing displays.
//!
//! The [`Loader`] turns a [`Document`](crate::document::Document) into a
//! [`WidgetTree`](crate::widget::WidgetTree). For every widget fragment it
//! asks the registry for candidate descriptors and runs each candidate's
//! configurator chain until one accepts. A chain may instead rewrite the
//! fragment and ask for it to be read again; the loader follows such
//! requests up to [`LoaderConfig::max_reparse`] times.
//!
//! [`writer`] produces the current persisted layout from a widget tree.

pub mod config;
pub mod configurator;
pub mod io;
pub mod reader;
pub mod writer;

pub use config::{LoaderConfig, WriterConfig};
pub use configurator::{import_properties, ConfigureContext, ConfigureStep, Outcome, Step};
pub use reader::{DisplayModel, LoadState, Loader};
pub use writer::{write_display, write_widget_document};

use crate::document::{DocumentError, QueryError};
use crate::property::PropertyError;
use crate::version::VersionError;
use crate::widget::TreeError;

// ---------------------------------------------------------------------------
// LoadError
// ---------------------------------------------------------------------------

/// Errors raised while loading widgets.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("widget element has neither 'type' nor 'typeId'")]
    MissingType,
    #[error("invalid version for '{type_id}': {source}")]
    Version {
        type_id: String,
        #[source]
        source: VersionError,
    },
    #[error("cannot read '{property}' of '{type_id}': {source}")]
    Property {
        type_id: String,
        property: String,
        #[source]
        source: PropertyError,
    },
    #[error("invalid '{type_id}' fragment: {source}")]
    Fragment {
        type_id: String,
        #[source]
        source: QueryError,
    },
    #[error("'{type_id}' was rewritten more than {limit} times")]
    TooManyReparse { type_id: String, limit: usize },
    #[error("document root must be <display>, found <{0}>")]
    NotADisplay(String),
    #[error("no widget type registered for '{0}'")]
    UnknownType(String),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl LoadError {
    pub(crate) fn property(type_id: &str, property: &str, source: PropertyError) -> Self {
        LoadError::Property {
            type_id: type_id.to_string(),
            property: property.to_string(),
            source,
        }
    }

    /// Whether the error concerns only the widget being loaded, so the
    /// rest of the display can still load around a placeholder.
    pub fn is_widget_local(&self) -> bool {
        matches!(
            self,
            LoadError::MissingType
                | LoadError::Version { .. }
                | LoadError::Property { .. }
                | LoadError::Fragment { .. }
                | LoadError::UnknownType(_)
        )
    }
}

// ---------------------------------------------------------------------------
// LoadReport
// ---------------------------------------------------------------------------

/// What happened while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Widgets replaced by placeholders after an error.
    pub errors: usize,
    /// Type ids no descriptor accepted, in first-seen order.
    pub unknown_types: Vec<String>,
    /// Fragments rewritten and read again.
    pub rewrites: usize,
}

impl LoadReport {
    /// Whether every widget loaded as its own type.
    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.unknown_types.is_empty()
    }
}
