//! Placeholder: stands in for a fragment no registered type could load.
//!
//! The placeholder keeps the fragment's type id and version, so writing the
//! display again preserves at least the type, name, position and size. It
//! is never registered; the loader creates it directly.

use crate::loader::configurator::import_properties_leniently;
use crate::property::common::CONNECTED;
use crate::property::Property;
use crate::version::BASE_WIDGET_VERSION;
use crate::widget::{inherit_macros, WidgetCategory, WidgetDescriptor};

use super::common::visible;

pub const TYPE_ID: &str = "placeholder";

fn properties(properties: &mut Vec<Property>) {
    properties.push(CONNECTED.create_runtime(false));
}

pub static DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    type_id: TYPE_ID,
    legacy_ids: &[],
    label: "Placeholder",
    category: WidgetCategory::Misc,
    version: BASE_WIDGET_VERSION,
    default_size: (100, 20),
    properties: &[visible, properties],
    configurator: &[import_properties_leniently],
    aliases: &[],
    macro_scope: inherit_macros,
};
