//! Descriptors and enumerations shared by several widget types.

use super::container::{ArrayProperty, Property, StructProperty};
use super::descriptor::{Category, PropertyDescriptor};
use super::value::Color;
use crate::macros::Macros;
use crate::property_enum;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

property_enum! {
    /// Horizontal placement of text.
    pub enum HorizontalAlignment {
        Left,
        Center,
        Right,
    }
}

property_enum! {
    /// Orientation of tabs and similar strips.
    pub enum Direction {
        Horizontal,
        Vertical,
    }
}

property_enum! {
    /// How a numeric value is rendered as text.
    pub enum FormatOption {
        Default,
        Decimal,
        Exponential,
        Engineering,
        Hexadecimal,
        Compact,
        String,
        Sexagesimal,
        SexagesimalHms,
        SexagesimalDms,
        Binary,
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

pub const NAME: PropertyDescriptor<String> = PropertyDescriptor::new(Category::Widget, "name");
pub const X: PropertyDescriptor<i64> = PropertyDescriptor::new(Category::Position, "x");
pub const Y: PropertyDescriptor<i64> = PropertyDescriptor::new(Category::Position, "y");
pub const WIDTH: PropertyDescriptor<i64> = PropertyDescriptor::new(Category::Position, "width");
pub const HEIGHT: PropertyDescriptor<i64> = PropertyDescriptor::new(Category::Position, "height");
pub const VISIBLE: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Position, "visible");

pub const PV_NAME: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Widget, "pv_name");
pub const MACROS: PropertyDescriptor<Macros> = PropertyDescriptor::new(Category::Widget, "macros");
pub const FILE: PropertyDescriptor<String> = PropertyDescriptor::new(Category::Widget, "file");

pub const TEXT: PropertyDescriptor<String> = PropertyDescriptor::new(Category::Display, "text");
pub const TOOLTIP: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "tooltip");
pub const FOREGROUND_COLOR: PropertyDescriptor<Color> =
    PropertyDescriptor::new(Category::Display, "foreground_color");
pub const BACKGROUND_COLOR: PropertyDescriptor<Color> =
    PropertyDescriptor::new(Category::Display, "background_color");
pub const TRANSPARENT: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Display, "transparent");
pub const BORDER_WIDTH: PropertyDescriptor<i64> =
    PropertyDescriptor::new(Category::Display, "border_width");
pub const BORDER_COLOR: PropertyDescriptor<Color> =
    PropertyDescriptor::new(Category::Display, "border_color");
pub const HORIZONTAL_ALIGNMENT: PropertyDescriptor<HorizontalAlignment> =
    PropertyDescriptor::new(Category::Display, "horizontal_alignment");
pub const FORMAT: PropertyDescriptor<FormatOption> =
    PropertyDescriptor::new(Category::Display, "format");
pub const PRECISION: PropertyDescriptor<i64> =
    PropertyDescriptor::new(Category::Display, "precision");
pub const SHOW_UNITS: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Display, "show_units");
pub const LINE_COLOR: PropertyDescriptor<Color> =
    PropertyDescriptor::new(Category::Display, "line_color");
pub const SQUARE: PropertyDescriptor<bool> = PropertyDescriptor::new(Category::Display, "square");
pub const DIRECTION: PropertyDescriptor<Direction> =
    PropertyDescriptor::new(Category::Display, "direction");

pub const ENABLED: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Behavior, "enabled");
pub const BIT: PropertyDescriptor<i64> = PropertyDescriptor::new(Category::Behavior, "bit");
pub const LABELS_FROM_PV: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Behavior, "labels_from_pv");
pub const BORDER_ALARM_SENSITIVE: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Behavior, "border_alarm_sensitive");
pub const CONFIRM_MESSAGE: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "confirm_message");
pub const PASSWORD: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "password");
pub const ACTIVE_TAB: PropertyDescriptor<i64> =
    PropertyDescriptor::new(Category::Behavior, "active_tab");

pub const CONNECTED: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Runtime, "connected");

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Name of the action list property.
pub const ACTIONS: &str = "actions";

pub const ACTION_TYPE: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "type");
pub const ACTION_DESCRIPTION: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "description");
pub const ACTION_FILE: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "file");
pub const ACTION_TARGET: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "target");
pub const ACTION_PV: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "pv_name");
pub const ACTION_VALUE: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "value");
pub const ACTION_COMMAND: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "command");

/// Action type that opens another display.
pub const OPEN_DISPLAY: &str = "open_display";

/// One entry of the action list. The type is persisted as an attribute.
pub fn action(_index: usize) -> Property {
    Property::Struct(
        StructProperty::new(
            "action",
            Category::Behavior,
            vec![
                ACTION_TYPE.create(OPEN_DISPLAY.to_string()),
                ACTION_DESCRIPTION.create(String::new()),
                ACTION_FILE.create(String::new()),
                ACTION_TARGET.create(String::new()),
                ACTION_PV.create(String::new()),
                ACTION_VALUE.create(String::new()),
                ACTION_COMMAND.create(String::new()),
            ],
        )
        .with_attribute_field("type"),
    )
}

/// The action list every widget carries. Empty by default.
pub fn actions() -> Property {
    Property::Array(ArrayProperty::new(ACTIONS, Category::Behavior, action, 0, 0))
}

// ---------------------------------------------------------------------------
// Rules and scripts
// ---------------------------------------------------------------------------

/// Name of the rule list property.
pub const RULES: &str = "rules";
/// Name of the script list property.
pub const SCRIPTS: &str = "scripts";

pub const RULE_NAME: PropertyDescriptor<String> = PropertyDescriptor::new(Category::Behavior, "name");
pub const RULE_PROPERTY: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "prop_id");
pub const RULE_OUT_EXPRESSION: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Behavior, "out_exp");
pub const EXP_CONDITION: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "bool_exp");
pub const EXP_VALUE: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "value");
pub const EXP_EXPRESSION: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "expression");
pub const SCRIPT_PV: PropertyDescriptor<String> = PropertyDescriptor::new(Category::Behavior, "name");
pub const SCRIPT_PV_TRIGGER: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Behavior, "trigger");
pub const SCRIPT_FILE: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "file");
pub const SCRIPT_CHECK_CONNECTIONS: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Behavior, "check_connections");
pub const SCRIPT_TEXT: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Behavior, "text");

/// One `<exp>` of a rule: a condition and the value or expression that
/// applies while it holds. Values are kept as written, markup included.
pub fn rule_expression(_index: usize) -> Property {
    Property::Struct(
        StructProperty::new(
            "exp",
            Category::Behavior,
            vec![
                EXP_CONDITION.create(String::new()),
                EXP_VALUE.create(String::new()),
                EXP_EXPRESSION.create(String::new()),
            ],
        )
        .with_attribute_field("bool_exp")
        .with_markup_field("value"),
    )
}

/// A PV that feeds a rule or script. Triggers by default.
pub fn script_pv(_index: usize) -> Property {
    Property::Struct(
        StructProperty::new(
            "pv_name",
            Category::Behavior,
            vec![
                SCRIPT_PV.create(String::new()),
                SCRIPT_PV_TRIGGER.create(true),
            ],
        )
        .with_attribute_field("trigger")
        .with_content_field("name"),
    )
}

fn script_pvs() -> Property {
    Property::Array(ArrayProperty::new("pvs", Category::Behavior, script_pv, 0, 0).inline())
}

/// One rule: the property it drives and its expressions, in order.
pub fn rule(_index: usize) -> Property {
    Property::Struct(
        StructProperty::new(
            "rule",
            Category::Behavior,
            vec![
                RULE_NAME.create("Rule".to_string()),
                RULE_PROPERTY.create(String::new()),
                RULE_OUT_EXPRESSION.create(false),
                Property::Array(
                    ArrayProperty::new("expressions", Category::Behavior, rule_expression, 0, 0)
                        .inline(),
                ),
                script_pvs(),
            ],
        )
        .with_attribute_field("name")
        .with_attribute_field("prop_id")
        .with_attribute_field("out_exp"),
    )
}

/// One script: a file, or embedded text, and the PVs that run it.
pub fn script(_index: usize) -> Property {
    Property::Struct(
        StructProperty::new(
            "script",
            Category::Behavior,
            vec![
                SCRIPT_FILE.create(String::new()),
                SCRIPT_CHECK_CONNECTIONS.create(true),
                SCRIPT_TEXT.create(String::new()),
                script_pvs(),
            ],
        )
        .with_attribute_field("file")
        .with_attribute_field("check_connections"),
    )
}

/// The rule list every widget carries. Empty by default.
pub fn rules() -> Property {
    Property::Array(ArrayProperty::new(RULES, Category::Behavior, rule, 0, 0))
}

/// The script list every widget carries. Empty by default.
pub fn scripts() -> Property {
    Property::Array(ArrayProperty::new(SCRIPTS, Category::Behavior, script, 0, 0))
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Default text color.
pub fn text_color() -> Color {
    Color::rgb(0, 0, 0).named("Text")
}

/// Default widget background.
pub fn background_color() -> Color {
    Color::rgb(255, 255, 255).named("Background")
}

/// Default read-only field background.
pub fn read_background_color() -> Color {
    Color::rgb(240, 240, 240).named("Read_Background")
}

/// Default button background.
pub fn button_background_color() -> Color {
    Color::rgb(210, 210, 210).named("Button_Background")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{PropertyType, Value};

    #[test]
    fn action_entries_are_structured() {
        let entry = action(0);
        let fields = entry.as_struct().unwrap();
        assert_eq!(fields.attribute_fields(), ["type"]);
        assert_eq!(
            fields.field("type").unwrap().get::<String>().unwrap(),
            OPEN_DISPLAY
        );
        assert!(actions().as_array().unwrap().elements().is_empty());
    }

    #[test]
    fn rule_entries_keep_attributes_and_inline_lists() {
        let entry = rule(0);
        let fields = entry.as_struct().unwrap();
        assert_eq!(fields.attribute_fields(), ["name", "prop_id", "out_exp"]);
        let expressions = fields.field("expressions").unwrap().as_array().unwrap();
        assert!(expressions.is_inline());
        assert_eq!(expressions.element_tag(), "exp");

        let pv = script_pv(0);
        let pv = pv.as_struct().unwrap();
        assert_eq!(pv.content_field(), Some("name"));
        assert!(pv.field("trigger").unwrap().get::<bool>().unwrap());
        assert!(rules().is_default());
        assert!(scripts().is_default());
    }

    #[test]
    fn format_choices_follow_variant_order() {
        assert_eq!(FormatOption::choices()[4], "Hexadecimal");
        assert_eq!(FormatOption::Hexadecimal.into_value(), Value::Enum(4));
    }
}
