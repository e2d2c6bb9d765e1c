//! Group: a container that draws an optional frame around its children.

use crate::loader::{import_properties, ConfigureContext, LoadError, Step};
use crate::property::common::{self, BACKGROUND_COLOR, FOREGROUND_COLOR, TRANSPARENT};
use crate::property::{Category, Property, PropertyDescriptor};
use crate::property_enum;
use crate::version::BASE_WIDGET_VERSION;
use crate::widget::{own_macros, WidgetCategory, WidgetDescriptor};

use super::common::{children, legacy_actions, legacy_rules, macros, visible};

pub const TYPE_ID: &str = "group";

pub const LEGACY_GROUP: &str = "org.csstudio.opibuilder.widgets.groupingContainer";

property_enum! {
    /// Frame drawn around a group.
    pub enum Style {
        Group,
        Title,
        Line,
        None,
    }
}

impl Style {
    /// Style for a legacy `border_style` number.
    pub fn from_legacy_border(border_style: i64) -> Self {
        match border_style {
            13 => Style::Group,
            12 => Style::Title,
            0 | 15 => Style::None,
            _ => Style::Line,
        }
    }

    /// Space the frame takes from the content, as `(x, y)`.
    ///
    /// The frame is only measured when drawn; these values were found by
    /// comparing rendered legacy displays.
    pub fn insets(self) -> (i64, i64) {
        match self {
            Style::None => (0, 0),
            Style::Line => (2, 2),
            Style::Title => (2, 20),
            Style::Group => (30, 30),
        }
    }
}

pub const STYLE: PropertyDescriptor<Style> = PropertyDescriptor::new(Category::Display, "style");

fn properties(properties: &mut Vec<Property>) {
    properties.push(STYLE.create(Style::Group));
    properties.push(FOREGROUND_COLOR.create(common::text_color()));
    properties.push(BACKGROUND_COLOR.create(common::background_color()));
    properties.push(TRANSPARENT.create(false));
}

fn legacy_style(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if ctx.older_than(2) {
        let border_style = ctx.child_int("border_style")?.unwrap_or(0);
        ctx.set(&STYLE, Style::from_legacy_border(border_style))?;
    }
    Ok(Step::Continue)
}

pub static DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    type_id: TYPE_ID,
    legacy_ids: &[LEGACY_GROUP],
    label: "Group",
    category: WidgetCategory::Structure,
    version: BASE_WIDGET_VERSION,
    default_size: (300, 200),
    properties: &[visible, macros, properties, children],
    configurator: &[legacy_actions, legacy_rules, import_properties, legacy_style],
    aliases: &[],
    macro_scope: own_macros,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DisplayModel;
    use pretty_assertions::assert_eq;

    #[test]
    fn legacy_border_styles() {
        assert_eq!(Style::from_legacy_border(13), Style::Group);
        assert_eq!(Style::from_legacy_border(12), Style::Title);
        assert_eq!(Style::from_legacy_border(0), Style::None);
        assert_eq!(Style::from_legacy_border(1), Style::Line);
        assert_eq!(Style::Title.insets(), (2, 20));
    }

    #[test]
    fn legacy_group_with_children() {
        let model = DisplayModel::from_xml(
            r#"<display version="1.0.0">
                 <widget typeId="org.csstudio.opibuilder.widgets.groupingContainer" version="1.0.0">
                   <name>Box</name>
                   <border_style>12</border_style>
                   <widget typeId="org.csstudio.opibuilder.widgets.Label" version="1.0.0">
                     <name>Inner</name>
                   </widget>
                 </widget>
               </display>"#,
        )
        .unwrap();
        let group = model.tree.find_by_name(model.root, "Box").unwrap();
        let widget = model.tree.get(group).unwrap();
        assert_eq!(widget.type_id(), TYPE_ID);
        assert_eq!(widget.get(&STYLE).unwrap(), Style::Title);

        let inner = model.tree.find_by_name(model.root, "Inner").unwrap();
        assert_eq!(model.tree.parent(inner), Some(group));
        assert!(model.report.is_clean());
    }
}
