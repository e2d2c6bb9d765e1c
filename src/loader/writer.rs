//! Writing widget trees in the current persisted layout.
//!
//! Every widget is written with its own type id and version. Runtime
//! properties and properties still at their default are left out, so a
//! loaded-then-saved legacy file only carries what it actually set.

use tracing::debug;

use super::io::write_property;
use super::WriterConfig;
use crate::document::{Document, DocumentError, ElementData, ElementId, DISPLAY_TAG, WIDGET_TAG};
use crate::property::Property;
use crate::widget::{WidgetId, WidgetTree};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Serialize the display rooted at `root`.
///
/// The root is written as `<display version="..">` without a type attribute;
/// its top-level children follow its properties as `<widget>` elements.
pub fn write_display(
    tree: &WidgetTree,
    root: WidgetId,
    config: &WriterConfig,
) -> Result<String, DocumentError> {
    let document = display_document(tree, root)?;
    let body = match document.root() {
        Some(element) => document.to_xml(element, config.indent)?,
        None => return Err(DocumentError::MissingRoot),
    };
    let separator = if config.indent.is_some() { "\n" } else { "" };
    debug!(widgets = tree.walk_depth_first(root).len(), "display written");
    Ok(format!("{DECLARATION}{separator}{body}"))
}

/// Serialize one widget and its children as a standalone `<widget>` fragment.
pub fn write_widget_document(
    tree: &WidgetTree,
    id: WidgetId,
    config: &WriterConfig,
) -> Result<String, DocumentError> {
    let widget = tree.get(id).ok_or(DocumentError::MissingRoot)?;
    let mut document = Document::new();
    let element = document.insert(widget_element(widget));
    write_body(&mut document, element, tree, id);
    document.to_xml(element, config.indent)
}

/// Build the display element tree without serializing it.
pub fn display_document(tree: &WidgetTree, root: WidgetId) -> Result<Document, DocumentError> {
    let widget = tree.get(root).ok_or(DocumentError::MissingRoot)?;
    let mut document = Document::new();
    let element = document.insert(
        ElementData::new(DISPLAY_TAG).with_attribute("version", widget.version().to_string()),
    );
    write_body(&mut document, element, tree, root);
    Ok(document)
}

/// Append widget `id` as a `<widget>` child of `parent`.
pub(crate) fn write_widget(
    doc: &mut Document,
    parent: ElementId,
    tree: &WidgetTree,
    id: WidgetId,
) -> Option<ElementId> {
    let widget = tree.get(id)?;
    let element = doc.insert_child(parent, widget_element(widget));
    write_body(doc, element, tree, id);
    Some(element)
}

fn widget_element(widget: &crate::widget::Widget) -> ElementData {
    ElementData::new(WIDGET_TAG)
        .with_attribute("type", widget.type_id())
        .with_attribute("version", widget.version().to_string())
}

/// Properties of `id` followed by its top-level children.
fn write_body(doc: &mut Document, element: ElementId, tree: &WidgetTree, id: WidgetId) {
    let Some(widget) = tree.get(id) else {
        return;
    };
    for property in widget.properties() {
        if matches!(property, Property::Children(_)) || property.is_runtime() || property.is_default()
        {
            continue;
        }
        write_property(doc, element, property, Some(tree));
    }
    if let Some(children) = widget.children() {
        for &child in children.ids() {
            write_widget(doc, element, tree, child);
        }
    }
}
