//! Action button: runs the widget's actions when pressed.
//!
//! Legacy menu buttons load either as action buttons or as combos. A menu
//! button that took its entries from the PV (the default), or that has no
//! actions at all, is a combo; one with its own actions is an action button.

use crate::loader::{import_properties, ConfigureContext, LoadError, Step};
use crate::property::common::{
    self, HorizontalAlignment, ACTIONS, BACKGROUND_COLOR, CONFIRM_MESSAGE, ENABLED,
    FOREGROUND_COLOR, HORIZONTAL_ALIGNMENT, PASSWORD, PV_NAME, TEXT, TOOLTIP, TRANSPARENT,
};
use crate::property::{Category, Property, PropertyDescriptor};
use crate::version::Version;
use crate::widget::{inherit_macros, WidgetCategory, WidgetDescriptor};

use super::common::{legacy_actions, legacy_pv, legacy_rules, pv, visible};

pub const TYPE_ID: &str = "action_button";

pub const LEGACY_ACTION_BUTTON: &str = "org.csstudio.opibuilder.widgets.ActionButton";
pub const LEGACY_MENU_BUTTON: &str = "org.csstudio.opibuilder.widgets.MenuButton";
pub const LEGACY_NATIVE_BUTTON: &str = "org.csstudio.opibuilder.widgets.NativeButton";

/// Button text that shows the PV's value.
pub const VALUE_LABEL: &str = "$(pv_value)";

/// Tooltip of action buttons; there is no value to show.
pub const ACTIONS_TOOLTIP: &str = "$(pv_name)\n$(actions)";

pub const CONFIRM_DIALOG: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Behavior, "confirm_dialog");
pub const PV_WRITABLE: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Runtime, "pv_writable");

fn properties(properties: &mut Vec<Property>) {
    properties.push(TEXT.create("$(actions)".to_string()));
    properties.push(FOREGROUND_COLOR.create(common::text_color()));
    properties.push(BACKGROUND_COLOR.create(common::button_background_color()));
    properties.push(TRANSPARENT.create(false));
    properties.push(HORIZONTAL_ALIGNMENT.create(HorizontalAlignment::Center));
    properties.push(ENABLED.create(true));
    properties.push(PV_WRITABLE.create_runtime(true));
    properties.push(CONFIRM_DIALOG.create(false));
    properties.push(CONFIRM_MESSAGE.create("Are you sure you want to do this?".to_string()));
    properties.push(PASSWORD.create(String::new()));
}

/// Replace the PV tooltip contributed by [`pv`].
fn tooltip(properties: &mut Vec<Property>) {
    properties.retain(|p| p.name() != TOOLTIP.name);
    properties.push(TOOLTIP.create(ACTIONS_TOOLTIP.to_string()));
}

// ---------------------------------------------------------------------------
// Menu button disambiguation
// ---------------------------------------------------------------------------

/// Whether the fragment is a legacy menu button.
pub fn is_menu_button(ctx: &ConfigureContext<'_>) -> bool {
    ctx.fragment_type() == Some(LEGACY_MENU_BUTTON)
}

/// Whether a legacy menu button should load as a combo.
pub fn menu_button_is_combo(ctx: &ConfigureContext<'_>) -> bool {
    if ctx.child_bool("actions_from_pv").unwrap_or(true) {
        return true;
    }
    let doc = ctx.document();
    let has_actions = doc
        .child_element(ctx.element, ACTIONS)
        .and_then(|actions| doc.child_element(actions, "action"))
        .is_some();
    !has_actions
}

fn refuse_combo_menu(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if is_menu_button(ctx) && menu_button_is_combo(ctx) {
        return Ok(Step::Refuse);
    }
    Ok(Step::Continue)
}

/// Menu buttons kept their text in `label`.
fn menu_label(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if !is_menu_button(ctx) {
        return Ok(Step::Continue);
    }
    if ctx.has_child("label") {
        let label = ctx
            .child_string("label")
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| VALUE_LABEL.to_string());
        ctx.set(&TEXT, label)?;
    }
    Ok(Step::Continue)
}

// ---------------------------------------------------------------------------
// Version 3 migration
// ---------------------------------------------------------------------------

/// Before 3.0.0 the tooltip showed `pv_value` and each action had its own
/// confirmation. The last non-blank action message becomes the button's.
fn legacy_confirmation(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if !ctx.older_than(3) {
        return Ok(Step::Continue);
    }
    let tip = ctx.get(&TOOLTIP)?;
    ctx.set(&TOOLTIP, tip.replace("pv_value", "actions"))?;

    let doc = ctx.document();
    let message = doc
        .child_element(ctx.element, ACTIONS)
        .map(|actions| doc.child_elements(actions, "action"))
        .unwrap_or_default()
        .into_iter()
        .filter_map(|action| doc.child_string(action, CONFIRM_MESSAGE.name))
        .filter(|message| !message.trim().is_empty())
        .last()
        .map(str::to_string);
    if let Some(message) = message {
        ctx.set(&CONFIRM_MESSAGE, message)?;
        ctx.set(&CONFIRM_DIALOG, true)?;
    }
    Ok(Step::Continue)
}

/// Without a PV, drop the PV line from the tooltip and the value text.
fn strip_empty_pv(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if !ctx.get(&PV_NAME)?.is_empty() {
        return Ok(Step::Continue);
    }
    let tip = ctx.get(&TOOLTIP)?;
    ctx.set(&TOOLTIP, tip.replace("$(pv_name)\n", ""))?;
    if ctx.get(&TEXT)? == VALUE_LABEL {
        ctx.set(&TEXT, String::new())?;
    }
    Ok(Step::Continue)
}

pub static DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    type_id: TYPE_ID,
    legacy_ids: &[LEGACY_ACTION_BUTTON, LEGACY_MENU_BUTTON, LEGACY_NATIVE_BUTTON],
    label: "Action Button",
    category: WidgetCategory::Control,
    version: Version::new(3, 0, 0),
    default_size: (100, 30),
    properties: &[visible, pv, tooltip, properties],
    configurator: &[
        refuse_combo_menu,
        legacy_actions,
        legacy_rules,
        import_properties,
        legacy_pv,
        menu_label,
        legacy_confirmation,
        strip_empty_pv,
    ],
    aliases: &[],
    macro_scope: inherit_macros,
};
