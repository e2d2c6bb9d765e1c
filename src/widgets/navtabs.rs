//! Navigation tabs: each tab names a display file and the macros to open
//! it with. The active tab's macros join the widget's scope.

use crate::loader::import_properties;
use crate::macros::Macros;
use crate::property::common::{self, Direction, ACTIVE_TAB, DIRECTION, FILE, MACROS};
use crate::property::{ArrayProperty, Category, Color, Property, PropertyDescriptor, StructProperty};
use crate::version::BASE_WIDGET_VERSION;
use crate::widget::{own_macros, Widget, WidgetCategory, WidgetDescriptor};

use super::common::{macros, visible};
use super::embedded::GROUP_NAME;
use super::tabs::{TAB_HEIGHT, TAB_NAME};

pub const TYPE_ID: &str = "navtabs";

pub const TABS: &str = "tabs";

pub const TAB_WIDTH: PropertyDescriptor<i64> =
    PropertyDescriptor::new(Category::Display, "tab_width");
pub const TAB_SPACING: PropertyDescriptor<i64> =
    PropertyDescriptor::new(Category::Display, "tab_spacing");
pub const SELECTED_COLOR: PropertyDescriptor<Color> =
    PropertyDescriptor::new(Category::Display, "selected_color");
pub const DESELECTED_COLOR: PropertyDescriptor<Color> =
    PropertyDescriptor::new(Category::Display, "deselected_color");

fn tab(index: usize) -> Property {
    Property::Struct(StructProperty::new(
        "tab",
        Category::Widget,
        vec![
            TAB_NAME.create(format!("Tab {}", index + 1)),
            FILE.create(String::new()),
            MACROS.create(Macros::new()),
            GROUP_NAME.create(String::new()),
        ],
    ))
}

fn properties(properties: &mut Vec<Property>) {
    properties.push(Property::Array(ArrayProperty::new(
        TABS,
        Category::Widget,
        tab,
        1,
        1,
    )));
    properties.push(ACTIVE_TAB.create(0));
    properties.push(DIRECTION.create(Direction::Horizontal));
    properties.push(TAB_WIDTH.create(100));
    properties.push(TAB_HEIGHT.create(30));
    properties.push(TAB_SPACING.create(2));
    properties.push(SELECTED_COLOR.create(Color::rgb(236, 236, 236)));
    properties.push(DESELECTED_COLOR.create(Color::rgb(200, 200, 200)));
    properties.push(common::BACKGROUND_COLOR.create(common::background_color()));
}

/// Macros of the tab selected by `active_tab`, if it exists.
pub fn active_tab_macros(widget: &Widget) -> Option<Macros> {
    let active = usize::try_from(widget.get(&ACTIVE_TAB).ok()?).ok()?;
    widget
        .array(TABS)?
        .element(active)?
        .as_struct()?
        .field(MACROS.name)?
        .get()
        .ok()
}

/// Own macros, then those of the active tab.
pub fn navtabs_macros(widget: &Widget, inherited: Macros) -> Macros {
    let scope = own_macros(widget, inherited);
    match active_tab_macros(widget) {
        Some(tab) => scope.merged(&tab),
        None => scope,
    }
}

pub static DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    type_id: TYPE_ID,
    legacy_ids: &[],
    label: "Navigation Tabs",
    category: WidgetCategory::Structure,
    version: BASE_WIDGET_VERSION,
    default_size: (400, 300),
    properties: &[visible, macros, properties],
    configurator: &[import_properties],
    aliases: &[],
    macro_scope: navtabs_macros,
};
