//! Embedded display: shows another display file inside this one.
//!
//! Legacy linking containers could draw a titled frame around the content.
//! There is no such frame now, so those fragments are rewritten into a
//! group holding the embedded display and read again.

use tracing::{debug, warn};

use crate::document::{ElementData, WIDGET_TAG};
use crate::loader::io::persist_property;
use crate::loader::{import_properties, ConfigureContext, LoadError, Step};
use crate::macros::Macros;
use crate::property::common::{FILE, HEIGHT, NAME, TRANSPARENT, WIDTH, X, Y};
use crate::property::{Category, Property, PropertyDescriptor};
use crate::property_enum;
use crate::version::BASE_WIDGET_VERSION;
use crate::widget::{own_macros, PropertyAlias, Widget, WidgetCategory, WidgetDescriptor};

use super::common::{border, legacy_actions, legacy_border, legacy_rules, macros, visible};
use super::group::{self, Style, STYLE};

pub const TYPE_ID: &str = "embedded";

pub const LEGACY_LINKING_CONTAINER: &str = "org.csstudio.opibuilder.widgets.linkingContainer";

/// Macro holding the embedding widget's runtime id.
pub const LCID: &str = "LCID";

property_enum! {
    /// How content and widget sizes are matched.
    pub enum Resize {
        None,
        ResizeContent,
        SizeToContent,
        StretchContent,
        Crop,
    }
}

pub const RESIZE: PropertyDescriptor<Resize> = PropertyDescriptor::new(Category::Display, "resize");
pub const GROUP_NAME: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Widget, "group_name");

fn properties(properties: &mut Vec<Property>) {
    properties.push(FILE.create(String::new()));
    properties.push(RESIZE.create(Resize::None));
    properties.push(GROUP_NAME.create(String::new()));
    properties.push(TRANSPARENT.create(false));
}

/// Own macros, plus [`LCID`].
pub fn embedded_macros(widget: &Widget, inherited: Macros) -> Macros {
    own_macros(widget, inherited).with(LCID, widget.runtime_id())
}

/// Linking containers before 2.0.0.
fn legacy(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if !ctx.older_than(2) {
        return Ok(Step::Continue);
    }

    if !ctx.has_child(FILE.name) {
        if let Some(file) = ctx.child_string("opi_file") {
            ctx.set(&FILE, file)?;
        }
    }

    if let Some(text) = ctx.child_string("resize_behaviour") {
        match text.parse::<i64>() {
            Ok(0) => ctx.set(&RESIZE, Resize::ResizeContent)?,
            Ok(1) => ctx.set(&RESIZE, Resize::SizeToContent)?,
            // Scroll and crop both crop now.
            Ok(_) => ctx.set(&RESIZE, Resize::Crop)?,
            Err(_) => warn!(text = %text, "cannot decode legacy resize_behaviour"),
        }
    }

    match ctx.child_int("border_style")? {
        Some(border_style @ (12 | 13)) => wrap_in_group(ctx, Style::from_legacy_border(border_style)),
        _ => Ok(Step::Continue),
    }
}

/// Move the fragment into a new group fragment that takes over its slot,
/// name, position and size, and draws the frame.
///
/// The embedded fragment loses its border, moves to the group's origin,
/// shrinks by the frame insets and is stamped with the current version,
/// with the values migrated so far written back in current form. Reading
/// it again does not wrap it a second time.
fn wrap_in_group(ctx: &mut ConfigureContext<'_>, style: Style) -> Result<Step, LoadError> {
    let element = ctx.element;
    let widget = &*ctx.widget;
    let name = widget.name();
    let (x, y) = (get(widget, &X)?, get(widget, &Y)?);
    let (width, height) = (get(widget, &WIDTH)?, get(widget, &HEIGHT)?);
    let (x_inset, y_inset) = style.insets();

    let doc = ctx.loader.document_mut();
    let data = ElementData::new(WIDGET_TAG)
        .with_attribute("type", group::TYPE_ID)
        .with_attribute("version", group::DESCRIPTOR.version.to_string());
    let wrapper = match doc.parent(element) {
        Some(parent) => {
            let index = doc.index_in_parent(element).unwrap_or(0);
            doc.insert_child_at(parent, index, data)
        }
        None => doc.insert(data),
    };
    doc.update_child_text(wrapper, NAME.name, name.clone());
    doc.update_child_text(wrapper, STYLE.name, style.ordinal().to_string());
    doc.update_child_text(wrapper, X.name, x.to_string());
    doc.update_child_text(wrapper, Y.name, y.to_string());
    doc.update_child_text(wrapper, WIDTH.name, width.to_string());
    doc.update_child_text(wrapper, HEIGHT.name, height.to_string());

    for tag in [
        "border_style",
        "border_width",
        "opi_file",
        "resize_behaviour",
        X.name,
        Y.name,
    ] {
        while doc.remove_child_element(element, tag).is_some() {}
    }
    for migrated in [FILE.name, RESIZE.name] {
        if let Some(property) = widget.property(migrated) {
            persist_property(doc, element, property);
        }
    }
    doc.update_child_text(element, NAME.name, format!("{name}_Content"));
    doc.update_child_text(element, WIDTH.name, (width - x_inset).to_string());
    doc.update_child_text(element, HEIGHT.name, (height - y_inset).to_string());
    doc.set_attribute(element, "version", DESCRIPTOR.version.to_string());
    doc.move_to(element, wrapper, 0);

    debug!(name = %name, ?style, "embedded display wrapped in group");
    Ok(Step::Reparse {
        replacement: wrapper,
        reason: "embedded display border becomes group",
    })
}

fn get<T: crate::property::PropertyType>(
    widget: &Widget,
    descriptor: &PropertyDescriptor<T>,
) -> Result<T, LoadError> {
    widget
        .get(descriptor)
        .map_err(|e| LoadError::property(widget.type_id(), descriptor.name, e))
}

pub static DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    type_id: TYPE_ID,
    legacy_ids: &[LEGACY_LINKING_CONTAINER],
    label: "Embedded Display",
    category: WidgetCategory::Structure,
    version: BASE_WIDGET_VERSION,
    default_size: (400, 300),
    properties: &[visible, macros, properties, border],
    configurator: &[legacy_actions, legacy_rules, import_properties, legacy, legacy_border],
    aliases: &[PropertyAlias::Rename {
        legacy: "opi_file",
        current: "file",
    }],
    macro_scope: embedded_macros,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DisplayModel;
    use crate::property::common::BORDER_WIDTH;
    use pretty_assertions::assert_eq;

    const FRAMED: &str = r#"<display version="1.0.0">
        <widget typeId="org.csstudio.opibuilder.widgets.Label" version="1.0.0"><name>Before</name></widget>
        <widget typeId="org.csstudio.opibuilder.widgets.linkingContainer" version="1.0.0">
          <name>Panel</name>
          <opi_file>panel.opi</opi_file>
          <resize_behaviour>3</resize_behaviour>
          <border_style>12</border_style>
          <border_width>1</border_width>
          <x>10</x>
          <y>20</y>
          <width>200</width>
          <height>100</height>
        </widget>
        <widget typeId="org.csstudio.opibuilder.widgets.Label" version="1.0.0"><name>After</name></widget>
      </display>"#;

    #[test]
    fn framed_container_becomes_group() {
        let model = DisplayModel::from_xml(FRAMED).unwrap();
        let names: Vec<String> = model
            .tree
            .children(model.root)
            .into_iter()
            .map(|id| model.tree.get(id).unwrap().name())
            .collect();
        assert_eq!(names, vec!["Before", "Panel", "After"]);

        let wrapper = model.tree.find_by_name(model.root, "Panel").unwrap();
        let group = model.tree.get(wrapper).unwrap();
        assert_eq!(group.type_id(), group::TYPE_ID);
        assert_eq!(group.get(&STYLE).unwrap(), Style::Title);
        assert_eq!(group.get(&X).unwrap(), 10);
        assert_eq!(group.get(&WIDTH).unwrap(), 200);

        let content = model.tree.find_by_name(model.root, "Panel_Content").unwrap();
        assert_eq!(model.tree.parent(content), Some(wrapper));
        let embedded = model.tree.get(content).unwrap();
        assert_eq!(embedded.type_id(), TYPE_ID);
        assert_eq!(embedded.get(&FILE).unwrap(), "panel.opi");
        assert_eq!(embedded.get(&RESIZE).unwrap(), Resize::Crop);
        assert_eq!(embedded.get(&X).unwrap(), 0);
        assert_eq!(embedded.get(&WIDTH).unwrap(), 198);
        assert_eq!(embedded.get(&HEIGHT).unwrap(), 80);
        assert_eq!(embedded.get(&BORDER_WIDTH).unwrap(), 0);
        assert_eq!(model.report.rewrites, 1);
    }

    #[test]
    fn plain_legacy_container() {
        let model = DisplayModel::from_xml(
            r#"<display version="1.0.0">
                 <widget typeId="org.csstudio.opibuilder.widgets.linkingContainer" version="1.0.0">
                   <name>Inline</name>
                   <opi_file>a.opi</opi_file>
                   <resize_behaviour>1</resize_behaviour>
                 </widget>
               </display>"#,
        )
        .unwrap();
        let id = model.tree.find_by_name(model.root, "Inline").unwrap();
        let widget = model.tree.get(id).unwrap();
        assert_eq!(widget.get(&FILE).unwrap(), "a.opi");
        assert_eq!(widget.get(&RESIZE).unwrap(), Resize::SizeToContent);
        assert_eq!(model.report.rewrites, 0);
    }

    #[test]
    fn lcid_is_runtime_id() {
        let model = DisplayModel::from_xml(
            r#"<display><widget type="embedded"><name>E</name><macros><A>1</A></macros></widget></display>"#,
        )
        .unwrap();
        let id = model.tree.find_by_name(model.root, "E").unwrap();
        let macros = model.tree.effective_macros(id);
        assert_eq!(macros.get("A"), Some("1"));
        assert_eq!(macros.get(LCID), Some(model.tree.get(id).unwrap().runtime_id()));
    }
}
