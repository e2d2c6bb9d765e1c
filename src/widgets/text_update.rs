//! Text update: shows the value of a PV as text.

use tracing::warn;

use crate::loader::{import_properties, ConfigureContext, LoadError, Step};
use crate::property::common::{
    self, FormatOption, HorizontalAlignment, BACKGROUND_COLOR, FORMAT, FOREGROUND_COLOR,
    HORIZONTAL_ALIGNMENT, PRECISION, PV_NAME, SHOW_UNITS, TRANSPARENT,
};
use crate::property::{Category, Property, PropertyDescriptor};
use crate::property_enum;
use crate::version::BASE_WIDGET_VERSION;
use crate::widget::{inherit_macros, WidgetCategory, WidgetDescriptor};

use super::common::{
    border, has_rule_for, legacy_actions, legacy_border, legacy_format, legacy_pv, legacy_rules, pv,
    retype, visible, LEGACY_LABEL,
};
use super::label::WRAP_WORDS;

pub const TYPE_ID: &str = "textupdate";

pub const LEGACY_TEXT_UPDATE: &str = "org.csstudio.opibuilder.widgets.TextUpdate";

property_enum! {
    /// Text rotation in quarter turns, counterclockwise.
    pub enum RotationStep {
        None,
        Ninety,
        OneEighty,
        MinusNinety,
    }
}

impl RotationStep {
    /// Nearest step for `angle` degrees, counterclockwise. Angles that are
    /// not a multiple of 90 map to no rotation.
    pub fn for_angle(angle: f64) -> Self {
        let normalized = angle.rem_euclid(360.0).round() as i64;
        match normalized {
            90 => RotationStep::Ninety,
            180 => RotationStep::OneEighty,
            270 => RotationStep::MinusNinety,
            _ => RotationStep::None,
        }
    }
}

pub const ROTATION_STEP: PropertyDescriptor<RotationStep> =
    PropertyDescriptor::new(Category::Display, "rotation_step");
pub const INTERACTIVE: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Behavior, "interactive");

fn properties(properties: &mut Vec<Property>) {
    properties.push(FOREGROUND_COLOR.create(common::text_color()));
    properties.push(BACKGROUND_COLOR.create(common::read_background_color()));
    properties.push(TRANSPARENT.create(false));
    properties.push(FORMAT.create(FormatOption::Default));
    properties.push(PRECISION.create(-1));
    properties.push(SHOW_UNITS.create(true));
    properties.push(HORIZONTAL_ALIGNMENT.create(HorizontalAlignment::Left));
    properties.push(WRAP_WORDS.create(true));
    properties.push(ROTATION_STEP.create(RotationStep::None));
    properties.push(INTERACTIVE.create(false));
}

/// Legacy text updates also served as labels: one with text and no PV is
/// read again as a legacy label.
fn legacy(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if !ctx.older_than(2) {
        return Ok(Step::Continue);
    }
    legacy_format(ctx)?;

    // Legacy angles were clockwise.
    if let Some(angle) = ctx.child_double("rotation_angle")? {
        ctx.set(&ROTATION_STEP, RotationStep::for_angle(-angle))?;
    }

    let text = ctx.child_string("text").unwrap_or_default();
    let is_legacy_type = ctx
        .fragment_type()
        .is_some_and(|type_id| type_id.ends_with("TextUpdate"));
    if !text.is_empty()
        && ctx.get(&PV_NAME)?.is_empty()
        && is_legacy_type
        && !has_rule_for(ctx, PV_NAME.name)
    {
        warn!(name = %ctx.widget.name(), "text update with text but no PV read as label");
        return Ok(retype(ctx, LEGACY_LABEL, None, "text update used as label"));
    }
    Ok(Step::Continue)
}

pub static DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    type_id: TYPE_ID,
    legacy_ids: &[LEGACY_TEXT_UPDATE],
    label: "Text Update",
    category: WidgetCategory::Monitor,
    version: BASE_WIDGET_VERSION,
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
    use crate::document::Document;
    use crate::loader::Loader;
    use crate::property::common::TEXT;
    use crate::widget::WidgetId;
    use crate::widgets::label;

    fn load(xml: &str) -> (Loader, WidgetId) {
        let document = Document::parse(xml).unwrap();
        let root = document.root().unwrap();
        let mut loader = Loader::new(document);
        let id = loader.load_widget(root).unwrap();
        (loader, id)
    }

    #[test]
    fn rotation_angles() {
        assert_eq!(RotationStep::for_angle(90.0), RotationStep::Ninety);
        assert_eq!(RotationStep::for_angle(-90.0), RotationStep::MinusNinety);
        assert_eq!(RotationStep::for_angle(-180.0), RotationStep::OneEighty);
        assert_eq!(RotationStep::for_angle(45.0), RotationStep::None);
    }

    #[test]
    fn legacy_hex_format() {
        let (loader, id) = load(
            r#"<widget typeId="org.csstudio.opibuilder.widgets.TextUpdate" version="1.0.0">
                 <pv_name>  sim://ramp {"longString":true}</pv_name>
                 <format_type>3</format_type>
                 <rotation_angle>90</rotation_angle>
               </widget>"#,
        );
        let widget = loader.tree().get(id).unwrap();
        assert_eq!(widget.get(&PV_NAME).unwrap(), "sim://ramp");
        assert_eq!(widget.get(&FORMAT).unwrap(), FormatOption::String);
        assert_eq!(widget.get(&PRECISION).unwrap(), 8);
        assert_eq!(widget.get(&ROTATION_STEP).unwrap(), RotationStep::MinusNinety);
    }

    #[test]
    fn current_version_ignores_legacy_format() {
        let (loader, id) = load(
            r#"<widget type="textupdate" version="2.0.0"><format_type>3</format_type></widget>"#,
        );
        let widget = loader.tree().get(id).unwrap();
        assert_eq!(widget.get(&FORMAT).unwrap(), FormatOption::Default);
        assert_eq!(widget.get(&PRECISION).unwrap(), -1);
    }

    #[test]
    fn text_without_pv_becomes_label() {
        let (loader, id) = load(
            r#"<widget typeId="org.csstudio.opibuilder.widgets.TextUpdate" version="1.0.0">
                 <text>Static</text>
               </widget>"#,
        );
        let widget = loader.tree().get(id).unwrap();
        assert_eq!(widget.type_id(), label::TYPE_ID);
        assert_eq!(widget.get(&TEXT).unwrap(), "Static");
        assert_eq!(loader.report().rewrites, 1);
    }

    #[test]
    fn pv_rule_keeps_text_update() {
        let (loader, id) = load(
            r#"<widget typeId="org.csstudio.opibuilder.widgets.TextUpdate" version="1.0.0">
                 <text>Static</text>
                 <rules><rule name="r" prop_id="pv_name"/></rules>
               </widget>"#,
        );
        assert_eq!(loader.tree().get(id).unwrap().type_id(), TYPE_ID);
    }
}
