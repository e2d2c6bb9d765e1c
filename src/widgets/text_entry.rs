//! Text entry: writes typed values to a PV.

use tracing::warn;

use crate::loader::{import_properties, ConfigureContext, LoadError, Step};
use crate::property::common::{
    self, FormatOption, BACKGROUND_COLOR, ENABLED, FORMAT, FOREGROUND_COLOR, PRECISION, PV_NAME,
    SHOW_UNITS,
};
use crate::property::{Category, Color, Property, PropertyDescriptor};
use crate::version::Version;
use crate::widget::{inherit_macros, WidgetCategory, WidgetDescriptor};

use super::common::{
    border, legacy_actions, legacy_border, legacy_format, legacy_pv, legacy_rules, pv, retype,
    visible, LEGACY_LABEL,
};
use super::label::WRAP_WORDS;

pub const TYPE_ID: &str = "textentry";

pub const LEGACY_TEXT_INPUT: &str = "org.csstudio.opibuilder.widgets.TextInput";
pub const LEGACY_NATIVE_TEXT: &str = "org.csstudio.opibuilder.widgets.NativeText";

pub const MULTI_LINE: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Behavior, "multi_line");

/// Default background of editable fields.
pub fn write_background_color() -> Color {
    Color::rgb(128, 255, 255).named("Write_Background")
}

fn properties(properties: &mut Vec<Property>) {
    properties.push(FOREGROUND_COLOR.create(common::text_color()));
    properties.push(BACKGROUND_COLOR.create(write_background_color()));
    properties.push(FORMAT.create(FormatOption::Default));
    properties.push(PRECISION.create(-1));
    properties.push(SHOW_UNITS.create(true));
    properties.push(ENABLED.create(true));
    properties.push(WRAP_WORDS.create(false));
    properties.push(MULTI_LINE.create(false));
}

/// Text inputs before 3.0.0.
fn legacy(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if !ctx.older_than(3) {
        return Ok(Step::Continue);
    }
    legacy_format(ctx)?;

    if ctx.child_string("multiline_input").as_deref() == Some("true") {
        ctx.set(&MULTI_LINE, true)?;
    }

    let selector = ctx.child_int("selector_type")?.unwrap_or(0);
    if selector != 0 {
        warn!(selector, "legacy file or date selector of text entry is not supported");
    }

    // No transparent option, use a transparent background instead.
    if ctx.child_bool("transparent") == Some(true) {
        ctx.set(&BACKGROUND_COLOR, Color::rgba(0, 0, 0, 0))?;
    }

    let text = ctx.child_string("text").unwrap_or_default();
    let is_text_type = ctx
        .fragment_type()
        .is_some_and(|type_id| type_id.contains("Text"));
    if !text.is_empty() && ctx.get(&PV_NAME)?.is_empty() && is_text_type {
        warn!(name = %ctx.widget.name(), "text entry with text but no PV read as label");
        // Read as a 1.0.0 label so the legacy border still translates.
        return Ok(retype(ctx, LEGACY_LABEL, Some("1.0.0"), "text entry used as label"));
    }
    Ok(Step::Continue)
}

pub static DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    type_id: TYPE_ID,
    legacy_ids: &[LEGACY_TEXT_INPUT, LEGACY_NATIVE_TEXT],
    label: "Text Entry",
    category: WidgetCategory::Control,
    version: Version::new(3, 0, 0),
    default_size: (100, 20),
    properties: &[visible, pv, properties, border],
    configurator: &[
        legacy_actions,
        legacy_rules,
        import_properties,
        legacy_pv,
        legacy,
        legacy_border,
    ],
    aliases: &[],
    macro_scope: inherit_macros,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DisplayModel;
    use crate::property::common::TEXT;
    use crate::widgets::label;

    #[test]
    fn legacy_input_options() {
        let model = DisplayModel::from_xml(
            r#"<display version="1.0.0">
                 <widget typeId="org.csstudio.opibuilder.widgets.TextInput" version="2.0.0">
                   <name>In</name>
                   <pv_name>loc://x</pv_name>
                   <multiline_input>true</multiline_input>
                   <transparent>true</transparent>
                   <format_type>7</format_type>
                 </widget>
               </display>"#,
        )
        .unwrap();
        let id = model.tree.find_by_name(model.root, "In").unwrap();
        let widget = model.tree.get(id).unwrap();
        assert_eq!(widget.type_id(), TYPE_ID);
        assert!(widget.get(&MULTI_LINE).unwrap());
        assert_eq!(widget.get(&BACKGROUND_COLOR).unwrap(), Color::rgba(0, 0, 0, 0));
        assert_eq!(widget.get(&FORMAT).unwrap(), FormatOption::Engineering);
    }

    #[test]
    fn text_without_pv_becomes_legacy_label() {
        let model = DisplayModel::from_xml(
            r#"<display version="1.0.0">
                 <widget typeId="org.csstudio.opibuilder.widgets.TextInput" version="2.0.0">
                   <name>Caption</name>
                   <text>Setpoint</text>
                   <border_style>0</border_style>
                   <border_width>2</border_width>
                 </widget>
               </display>"#,
        )
        .unwrap();
        let id = model.tree.find_by_name(model.root, "Caption").unwrap();
        let widget = model.tree.get(id).unwrap();
        assert_eq!(widget.type_id(), label::TYPE_ID);
        assert_eq!(widget.get(&TEXT).unwrap(), "Setpoint");
        assert_eq!(widget.get(&crate::property::common::BORDER_WIDTH).unwrap(), 0);
        assert_eq!(model.report.rewrites, 1);
    }
}
