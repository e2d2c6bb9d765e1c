//! Multi-state LED: one color and label per PV value.
//!
//! Legacy LEDs with `state_count` are multi-state LEDs. Their states were
//! flat `state_color_<n>`, `state_value_<n>` and `state_label_<n>` elements
//! and now live in the `states` array.

use crate::loader::{import_properties, ConfigureContext, LoadError, Step};
use crate::property::{ArrayProperty, Category, Color, Property, PropertyDescriptor, StructProperty};
use crate::version::BASE_WIDGET_VERSION;
use crate::widget::{inherit_macros, PropertyAlias, WidgetCategory, WidgetDescriptor};

use super::common::{legacy_actions, legacy_pv, legacy_rules, pv, visible};
use super::led::{self, appearance, legacy_led, LEGACY_LED};

pub const TYPE_ID: &str = "multi_state_led";

pub const STATES: &str = "states";

pub const STATE_VALUE: PropertyDescriptor<i64> =
    PropertyDescriptor::new(Category::Behavior, "value");
pub const STATE_LABEL: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "label");
pub const STATE_COLOR: PropertyDescriptor<Color> =
    PropertyDescriptor::new(Category::Behavior, "color");
pub const FALLBACK_LABEL: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "fallback_label");
pub const FALLBACK_COLOR: PropertyDescriptor<Color> =
    PropertyDescriptor::new(Category::Behavior, "fallback_color");

/// Initial color of state `index`: off and on greens, then shades of blue.
pub fn default_state_color(index: usize) -> Color {
    match index {
        0 => Color::rgb(60, 100, 60).named("Off"),
        1 => Color::rgb(0, 255, 0).named("On"),
        n => {
            let blue = (40 * n).min(255) as u8;
            Color::rgb(10, 0, blue).named(format!("State {n}"))
        }
    }
}

fn state(index: usize) -> Property {
    Property::Struct(StructProperty::new(
        "state",
        Category::Behavior,
        vec![
            STATE_VALUE.create(index as i64),
            STATE_LABEL.create(format!("State {}", index + 1)),
            STATE_COLOR.create(default_state_color(index)),
        ],
    ))
}

fn properties(properties: &mut Vec<Property>) {
    properties.push(Property::Array(ArrayProperty::new(
        STATES,
        Category::Behavior,
        state,
        1,
        2,
    )));
    properties.push(FALLBACK_LABEL.create("Err".to_string()));
    properties.push(FALLBACK_COLOR.create(Color::rgb(255, 0, 255).named("Invalid")));
}

/// `off_color` and `on_color` belong to the two-state LED.
fn refuse_two_state(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if ctx.has_child(led::OFF_COLOR.name) || ctx.has_child(led::ON_COLOR.name) {
        return Ok(Step::Refuse);
    }
    Ok(Step::Continue)
}

fn legacy_states(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    let element = ctx.element;
    for (legacy, current) in [
        ("state_color_fallback", FALLBACK_COLOR.name),
        ("state_label_fallback", FALLBACK_LABEL.name),
    ] {
        if let Some(child) = ctx.document().child_element(element, legacy) {
            ctx.read_path(current, child)?;
        }
    }

    let mut index = 0;
    while let Some(color) = ctx.document().child_element(element, &format!("state_color_{index}")) {
        ctx.read_path(&format!("{STATES}[{index}].color"), color)?;
        for field in ["value", "label"] {
            let legacy = format!("state_{field}_{index}");
            if let Some(child) = ctx.document().child_element(element, &legacy) {
                ctx.read_path(&format!("{STATES}[{index}].{field}"), child)?;
            }
        }
        index += 1;
    }

    if let Some(count) = ctx.child_int("state_count")? {
        let count = usize::try_from(count.max(1)).unwrap_or(1);
        let type_id = ctx.widget.type_id().to_string();
        if let Some(states) = ctx.widget.array_mut(STATES) {
            states
                .resize(count)
                .map_err(|e| LoadError::property(&type_id, STATES, e))?;
        }
    }

    if ctx.child_bool("show_boolean_label") == Some(false) {
        if let Some(states) = ctx.widget.array(STATES) {
            for state in states.elements() {
                if let Some(label) = state.as_struct().and_then(|s| s.field(STATE_LABEL.name)) {
                    label
                        .set(String::new())
                        .map_err(|e| LoadError::property(TYPE_ID, STATES, e))?;
                }
            }
        }
    }
    Ok(Step::Continue)
}

pub static DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    type_id: TYPE_ID,
    legacy_ids: &[LEGACY_LED, led::TYPE_ID],
    label: "LED (Multi State)",
    category: WidgetCategory::Monitor,
    version: BASE_WIDGET_VERSION,
    default_size: (20, 20),
    properties: &[visible, pv, properties, appearance],
    configurator: &[
        refuse_two_state,
        legacy_actions,
        legacy_rules,
        import_properties,
        legacy_pv,
        legacy_states,
        legacy_led,
    ],
    aliases: &[PropertyAlias::Indexed {
        prefix: "state_",
        array: STATES,
    }],
    macro_scope: inherit_macros,
};
