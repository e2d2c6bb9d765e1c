//! Tabs: one child list per tab, only the active one shown.

use tracing::warn;

use crate::loader::{import_properties, ConfigureContext, LoadError, Step};
use crate::property::common::{self, Direction, ACTIVE_TAB, BACKGROUND_COLOR, DIRECTION};
use crate::property::{
    ArrayProperty, Category, ChildrenProperty, Property, PropertyDescriptor, StructProperty,
};
use crate::version::BASE_WIDGET_VERSION;
use crate::widget::{own_macros, WidgetCategory, WidgetDescriptor, CHILDREN};

use super::common::{legacy_rules, macros, visible};

pub const TYPE_ID: &str = "tabs";

pub const LEGACY_TAB: &str = "org.csstudio.opibuilder.widgets.tab";

pub const TABS: &str = "tabs";

pub const TAB_NAME: PropertyDescriptor<String> = PropertyDescriptor::new(Category::Widget, "name");
pub const TAB_HEIGHT: PropertyDescriptor<i64> =
    PropertyDescriptor::new(Category::Display, "tab_height");

fn tab(index: usize) -> Property {
    Property::Struct(StructProperty::new(
        "tab",
        Category::Display,
        vec![
            TAB_NAME.create(format!("Tab {}", index + 1)),
            Property::Children(ChildrenProperty::new(CHILDREN)),
        ],
    ))
}

fn properties(properties: &mut Vec<Property>) {
    properties.push(BACKGROUND_COLOR.create(common::background_color()));
    properties.push(ACTIVE_TAB.create(0));
    properties.push(Property::Array(ArrayProperty::new(
        TABS,
        Category::Display,
        tab,
        1,
        2,
    )));
    properties.push(DIRECTION.create(Direction::Horizontal));
    properties.push(TAB_HEIGHT.create(30));
}

/// Legacy tab widgets: `tab_count`, `tab_<n>_title`, and one grouping
/// container per tab whose children are the tab's content.
fn legacy(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    let count = match ctx.child_int("tab_count")? {
        Some(count) if ctx.older_than(2) => usize::try_from(count.max(1)).unwrap_or(1),
        _ => return Ok(Step::Continue),
    };
    let type_id = ctx.widget.type_id().to_string();
    if let Some(tabs) = ctx.widget.array_mut(TABS) {
        tabs.resize(count)
            .map_err(|e| LoadError::property(&type_id, TABS, e))?;
    }

    if let Some(height) = ctx.child_int("minimum_tab_height")? {
        ctx.set(&TAB_HEIGHT, height)?;
    }
    if ctx.child_string("horizontal_tabs").as_deref() == Some("false") {
        ctx.set(&DIRECTION, Direction::Vertical)?;
    }
    for index in 0..count {
        if let Some(title) = ctx.child_string(&format!("tab_{index}_title")) {
            ctx.set_path(&format!("{TABS}[{index}].name"), &title)?;
        }
    }

    let element = ctx.element;
    let contents = ctx.document().child_elements(element, crate::document::WIDGET_TAG);
    for (index, content) in contents.into_iter().enumerate() {
        let doc = ctx.document();
        let is_group = doc
            .attribute(content, "typeId")
            .or_else(|| doc.attribute(content, "type"))
            .is_some_and(|t| t.contains("group"));
        if !is_group || index >= count {
            warn!(tab = index, "legacy tab widget misses content of tab");
            break;
        }
        let ids = ctx.loader.read_widgets(content)?;
        let children = ctx
            .widget
            .lookup_mut(&format!("{TABS}[{index}].{CHILDREN}"), false)
            .ok()
            .and_then(Property::as_children_mut);
        if let Some(children) = children {
            children.set(ids);
        }
    }
    Ok(Step::Continue)
}

pub static DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    type_id: TYPE_ID,
    legacy_ids: &[LEGACY_TAB],
    label: "Tabs",
    category: WidgetCategory::Structure,
    version: BASE_WIDGET_VERSION,
    default_size: (400, 300),
    properties: &[visible, macros, properties],
    configurator: &[legacy_rules, import_properties, legacy],
    aliases: &[],
    macro_scope: own_macros,
};
