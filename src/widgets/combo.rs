//! Combo: selects one of several values and writes it to a PV.

use crate::loader::{import_properties, ConfigureContext, LoadError, Step};
use crate::property::common::{
    self, BACKGROUND_COLOR, CONFIRM_MESSAGE, ENABLED, FOREGROUND_COLOR,
};
use crate::property::{ArrayProperty, Category, Property, PropertyDescriptor};
use crate::version::BASE_WIDGET_VERSION;
use crate::widget::{inherit_macros, WidgetCategory, WidgetDescriptor};

use super::action_button::{is_menu_button, menu_button_is_combo, LEGACY_MENU_BUTTON};
use super::common::{border, legacy_actions, legacy_border, legacy_pv, legacy_rules, pv, visible};

pub const TYPE_ID: &str = "combo";

pub const LEGACY_COMBO: &str = "org.csstudio.opibuilder.widgets.combo";

pub const ITEMS: &str = "items";

pub const ITEM: PropertyDescriptor<String> = PropertyDescriptor::new(Category::Behavior, "item");
pub const ITEMS_FROM_PV: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Behavior, "items_from_pv");
pub const EDITABLE: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Behavior, "editable");

fn item(index: usize) -> Property {
    ITEM.create(format!("Item {}", index + 1))
}

fn properties(properties: &mut Vec<Property>) {
    properties.push(FOREGROUND_COLOR.create(common::text_color()));
    properties.push(BACKGROUND_COLOR.create(common::button_background_color()));
    properties.push(Property::Array(ArrayProperty::new(
        ITEMS,
        Category::Behavior,
        item,
        0,
        2,
    )));
    properties.push(ITEMS_FROM_PV.create(true));
    properties.push(EDITABLE.create(false));
    properties.push(ENABLED.create(true));
    properties.push(CONFIRM_MESSAGE.create(String::new()));
}

/// Menu buttons with their own actions are action buttons.
fn refuse_action_menu(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if is_menu_button(ctx) && !menu_button_is_combo(ctx) {
        return Ok(Step::Refuse);
    }
    Ok(Step::Continue)
}

/// A menu button's `actions_from_pv` becomes `items_from_pv`.
fn menu_items(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if is_menu_button(ctx) {
        let from_pv = ctx.child_bool("actions_from_pv").unwrap_or(true);
        ctx.set(&ITEMS_FROM_PV, from_pv)?;
    }
    Ok(Step::Continue)
}

pub static DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    type_id: TYPE_ID,
    legacy_ids: &[LEGACY_COMBO, LEGACY_MENU_BUTTON],
    label: "Combo Box",
    category: WidgetCategory::Control,
    version: BASE_WIDGET_VERSION,
    default_size: (100, 30),
    properties: &[visible, pv, properties, border],
    configurator: &[
        refuse_action_menu,
        legacy_actions,
        legacy_rules,
        import_properties,
        legacy_pv,
        menu_items,
        legacy_border,
    ],
    aliases: &[],
    macro_scope: inherit_macros,
};
