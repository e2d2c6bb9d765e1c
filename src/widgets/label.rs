//! Label: static text.

use crate::loader::import_properties;
use crate::property::common::{
    self, HorizontalAlignment, BACKGROUND_COLOR, FOREGROUND_COLOR, HORIZONTAL_ALIGNMENT, TEXT,
    TOOLTIP, TRANSPARENT,
};
use crate::property::{Category, Property, PropertyDescriptor};
use crate::version::BASE_WIDGET_VERSION;
use crate::widget::{inherit_macros, WidgetCategory, WidgetDescriptor};

use super::common::{border, legacy_actions, legacy_border, legacy_rules, visible, LEGACY_LABEL};

pub const TYPE_ID: &str = "label";

pub const AUTO_SIZE: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Display, "auto_size");
pub const WRAP_WORDS: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Display, "wrap_words");

fn properties(properties: &mut Vec<Property>) {
    properties.push(TEXT.create("Text".to_string()));
    properties.push(FOREGROUND_COLOR.create(common::text_color()));
    properties.push(BACKGROUND_COLOR.create(common::read_background_color()));
    properties.push(TRANSPARENT.create(true));
    properties.push(HORIZONTAL_ALIGNMENT.create(HorizontalAlignment::Left));
    properties.push(AUTO_SIZE.create(false));
    properties.push(WRAP_WORDS.create(true));
    properties.push(TOOLTIP.create(String::new()));
}

pub static DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    type_id: TYPE_ID,
    legacy_ids: &[LEGACY_LABEL],
    label: "Label",
    category: WidgetCategory::Graphic,
    version: BASE_WIDGET_VERSION,
    default_size: (100, 20),
    properties: &[visible, properties, border],
    configurator: &[legacy_actions, legacy_rules, import_properties, legacy_border],
    aliases: &[],
    macro_scope: inherit_macros,
};
