//! LED: shows one bit of a PV as an on/off light.
//!
//! Legacy LED fragments are shared with the multi-state LED; see
//! [`multi_state_led`](super::multi_state_led) for how they are told apart.

use crate::loader::{import_properties, ConfigureContext, LoadError, Step};
use crate::property::common::{
    self, BIT, FOREGROUND_COLOR, LABELS_FROM_PV, LINE_COLOR, SQUARE,
};
use crate::property::{Category, Color, Property, PropertyDescriptor};
use crate::version::BASE_WIDGET_VERSION;
use crate::widget::{inherit_macros, PropertyAlias, WidgetCategory, WidgetDescriptor};

use super::common::{legacy_actions, legacy_pv, legacy_rules, pv, visible};

pub const TYPE_ID: &str = "led";

pub const LEGACY_LED: &str = "org.csstudio.opibuilder.widgets.LED";

pub const OFF_COLOR: PropertyDescriptor<Color> =
    PropertyDescriptor::new(Category::Display, "off_color");
pub const ON_COLOR: PropertyDescriptor<Color> =
    PropertyDescriptor::new(Category::Display, "on_color");
pub const OFF_LABEL: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Display, "off_label");
pub const ON_LABEL: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Display, "on_label");

/// Elements only multi-state LEDs have.
const MULTI_STATE_MARKERS: &[&str] = &["state_count", "state_color_", "state_value_"];

/// Elements only boolean buttons have.
const BUTTON_MARKERS: &[&str] = &["toggle_button", "push_action_index", "released_action_index"];

/// Properties every LED shape has.
pub(crate) fn appearance(properties: &mut Vec<Property>) {
    properties.push(FOREGROUND_COLOR.create(common::text_color()));
    properties.push(LINE_COLOR.create(Color::rgba(50, 50, 50, 178)));
    properties.push(SQUARE.create(false));
}

fn properties(properties: &mut Vec<Property>) {
    properties.push(BIT.create(-1));
    properties.push(OFF_LABEL.create(String::new()));
    properties.push(OFF_COLOR.create(Color::rgb(60, 100, 60).named("Off")));
    properties.push(ON_LABEL.create(String::new()));
    properties.push(ON_COLOR.create(Color::rgb(0, 255, 0).named("On")));
    properties.push(LABELS_FROM_PV.create(false));
}

/// Whether the fragment has a child whose tag is `marker`, or starts with
/// it when `marker` ends in `_`.
fn has_marker(ctx: &ConfigureContext<'_>, markers: &[&str]) -> bool {
    let doc = ctx.document();
    doc.children(ctx.element).iter().any(|&child| {
        let tag = doc.tag(child);
        markers.iter().any(|marker| {
            if marker.ends_with('_') {
                tag.strip_prefix(marker)
                    .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
            } else {
                tag == *marker
            }
        })
    })
}

fn refuse_other_shapes(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if has_marker(ctx, MULTI_STATE_MARKERS) || has_marker(ctx, BUTTON_MARKERS) {
        return Ok(Step::Refuse);
    }
    Ok(Step::Continue)
}

/// Translation shared by both LED types for fragments before 2.0.0.
pub(crate) fn legacy_led(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if !ctx.older_than(2) {
        return Ok(Step::Continue);
    }
    if let Some(square) = ctx.child_bool("square_led") {
        ctx.set(&SQUARE, square)?;
    }
    Ok(Step::Continue)
}

/// Legacy bit handling: data type 1 (enum) uses the whole value.
fn legacy_bit(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if !ctx.older_than(2) {
        return Ok(Step::Continue);
    }
    if ctx.child_int("data_type")? == Some(1) {
        ctx.set(&BIT, -1)?;
    }
    if ctx.child_bool("show_boolean_label") == Some(false) {
        ctx.set(&OFF_LABEL, String::new())?;
        ctx.set(&ON_LABEL, String::new())?;
    }
    Ok(Step::Continue)
}

pub static DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    type_id: TYPE_ID,
    legacy_ids: &[LEGACY_LED],
    label: "LED",
    category: WidgetCategory::Monitor,
    version: BASE_WIDGET_VERSION,
    default_size: (20, 20),
    properties: &[visible, pv, properties, appearance],
    configurator: &[
        refuse_other_shapes,
        legacy_actions,
        legacy_rules,
        import_properties,
        legacy_pv,
        legacy_led,
        legacy_bit,
    ],
    aliases: &[PropertyAlias::Rename {
        legacy: "square_led",
        current: "square",
    }],
    macro_scope: inherit_macros,
};
