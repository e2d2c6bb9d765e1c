//! Widget descriptors: static metadata for each widget type.

use std::fmt;

use super::alias::PropertyAlias;
use super::Widget;
use crate::loader::ConfigureStep;
use crate::macros::Macros;
use crate::property::Property;
use crate::version::Version;

/// Adds a widget type's properties to the base set.
pub type PropertyContributor = fn(&mut Vec<Property>);

/// Computes a widget's macro scope from the scope it inherits.
pub type MacroScope = fn(&Widget, Macros) -> Macros;

/// Palette grouping of widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetCategory {
    Graphic,
    Monitor,
    Control,
    Structure,
    Misc,
}

/// Static description of a widget type.
///
/// Besides naming the type and building its property set, a descriptor owns
/// the configurator chain that turns a persisted fragment into a widget and
/// decides, by refusing, which fragments it will not take.
pub struct WidgetDescriptor {
    /// Current type id, written to files.
    pub type_id: &'static str,
    /// Ids of older formats this type can load.
    pub legacy_ids: &'static [&'static str],
    /// Human-readable name.
    pub label: &'static str,
    pub category: WidgetCategory,
    /// Version of the current persisted layout.
    pub version: Version,
    /// Default `(width, height)`.
    pub default_size: (i64, i64),
    /// Properties beyond the base set, in definition order.
    pub properties: &'static [PropertyContributor],
    /// Configurator chain, run in order.
    pub configurator: &'static [ConfigureStep],
    /// Legacy property names.
    pub aliases: &'static [PropertyAlias],
    pub macro_scope: MacroScope,
}

impl WidgetDescriptor {
    /// Create a widget with default properties.
    pub fn create_widget(&'static self) -> Widget {
        Widget::new(self)
    }

    /// Whether `type_id` is the current id or one of the legacy ids.
    pub fn accepts_type(&self, type_id: &str) -> bool {
        self.type_id == type_id || self.legacy_ids.iter().any(|id| *id == type_id)
    }
}

impl fmt::Debug for WidgetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetDescriptor")
            .field("type_id", &self.type_id)
            .field("version", &self.version)
            .field("legacy_ids", &self.legacy_ids)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Macro scopes
// ---------------------------------------------------------------------------

/// The widget sees exactly what its parent sees.
pub fn inherit_macros(_widget: &Widget, inherited: Macros) -> Macros {
    inherited
}

/// The widget's own `macros` property overrides what it inherits.
pub fn own_macros(widget: &Widget, inherited: Macros) -> Macros {
    match widget.own_macros() {
        Some(own) => inherited.merged(&own),
        None => inherited,
    }
}
