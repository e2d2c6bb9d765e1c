//! Reading properties from elements and writing them back.
//!
//! Layout of a property element `<name>`:
//! - scalars: the value as text; enums by ordinal
//! - colors: `<color name=".." red=".." green=".." blue=".." alpha=".."/>`
//! - macros: one child per macro, `<NAME>value</NAME>`
//! - arrays: one child per element, tags ignored on read; inline arrays
//!   put their elements straight into the enclosing structure
//! - structures: one child per non-default field, with fields marked as
//!   such persisted as attributes, as the element's own text, or as
//!   element markup
//! - nested child lists: `<widget>` fragments

use super::reader::Loader;
use super::LoadError;
use crate::document::{Document, DocumentError, ElementData, ElementId};
use crate::macros::Macros;
use crate::property::{
    ArrayProperty, Color, Property, PropertyError, ScalarProperty, StructProperty, Value,
    ValueKind, MAX_ARRAY_SIZE,
};
use crate::widget::WidgetTree;

/// Legacy marker inside `<macros>`; parent macros are always inherited now.
const INCLUDE_PARENT_MACROS: &str = "include_parent_macros";

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read `element` into `property`.
pub(crate) fn read_property(
    loader: &mut Loader,
    type_id: &str,
    property: &mut Property,
    element: ElementId,
) -> Result<(), LoadError> {
    match property {
        Property::Scalar(scalar) => read_scalar(loader.document(), scalar, element)
            .map_err(|source| LoadError::property(type_id, scalar.name(), source)),
        Property::Array(array) => {
            let items = loader.document().children(element).to_vec();
            read_elements(loader, type_id, array, items)
        }
        Property::Struct(structure) => read_struct(loader, type_id, structure, element),
        Property::Children(children) => {
            let ids = loader.read_widgets(element)?;
            children.set(ids);
            Ok(())
        }
    }
}

fn read_elements(
    loader: &mut Loader,
    type_id: &str,
    array: &mut ArrayProperty,
    items: Vec<ElementId>,
) -> Result<(), LoadError> {
    let name = array.name();
    if items.len() > MAX_ARRAY_SIZE {
        let source = PropertyError::MaximumSize {
            property: name.to_string(),
            maximum: MAX_ARRAY_SIZE,
            requested: items.len(),
        };
        return Err(LoadError::property(type_id, name, source));
    }
    let mut elements = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let mut entry = array.create_element(index);
        read_property(loader, type_id, &mut entry, item)?;
        elements.push(entry);
    }
    array
        .set_elements(elements)
        .map_err(|source| LoadError::property(type_id, name, source))
}

fn read_struct(
    loader: &mut Loader,
    type_id: &str,
    structure: &mut StructProperty,
    element: ElementId,
) -> Result<(), LoadError> {
    let attributes = structure.attribute_fields().to_vec();
    let content = structure.content_field();
    let markup: Vec<&'static str> = structure
        .fields()
        .iter()
        .map(Property::name)
        .filter(|name| structure.is_markup_field(name))
        .collect();

    for field in structure.fields_mut() {
        let name = field.name();
        let doc = loader.document();
        let field_error = |source: PropertyError| LoadError::property(type_id, name, source);

        if attributes.contains(&name) {
            if let (Some(value), Property::Scalar(scalar)) = (doc.attribute(element, name), &*field) {
                scalar.set_specification(value).map_err(field_error)?;
                continue;
            }
        }
        if content == Some(name) {
            if let Property::Scalar(scalar) = &*field {
                read_scalar(doc, scalar, element).map_err(field_error)?;
            }
            continue;
        }
        if let Property::Array(array) = &mut *field {
            if array.is_inline() {
                let items = doc.child_elements(element, array.element_tag());
                read_elements(loader, type_id, array, items)?;
                continue;
            }
        }
        let Some(child) = loader.document().child_element(element, name) else {
            continue;
        };
        if markup.contains(&name) {
            if let Property::Scalar(scalar) = &*field {
                let doc = loader.document();
                let text = if doc.children(child).is_empty() {
                    doc.text(child).to_string()
                } else {
                    inner_markup(doc, child).map_err(|e| {
                        field_error(PropertyError::InvalidValue {
                            property: name.to_string(),
                            message: e.to_string(),
                        })
                    })?
                };
                scalar.set(Value::Text(text)).map_err(field_error)?;
                continue;
            }
        }
        read_property(loader, type_id, field, child)?;
    }
    Ok(())
}

/// Child elements of `element` as compact XML text.
fn inner_markup(doc: &Document, element: ElementId) -> Result<String, DocumentError> {
    let mut text = String::new();
    for &child in doc.children(element) {
        text.push_str(&doc.to_xml(child, None)?);
    }
    Ok(text)
}

/// Read a scalar value from `element`.
pub fn read_scalar(
    doc: &Document,
    scalar: &ScalarProperty,
    element: ElementId,
) -> Result<(), PropertyError> {
    match scalar.kind() {
        ValueKind::Color => {
            let color = doc
                .child_element(element, "color")
                .ok_or_else(|| PropertyError::InvalidValue {
                    property: scalar.name().to_string(),
                    message: "missing <color>".to_string(),
                })
                .and_then(|color| read_color(doc, color, scalar.name()))?;
            scalar.set(Value::Color(color))
        }
        ValueKind::Macros => scalar.set(Value::Macros(read_macros(doc, element))),
        ValueKind::Text => scalar.set(Value::Text(doc.text(element).to_string())),
        _ => scalar.set_specification(doc.text(element)),
    }
}

/// Read a `<color>` element.
pub fn read_color(doc: &Document, element: ElementId, property: &str) -> Result<Color, PropertyError> {
    let component = |name: &str, default: Option<u8>| -> Result<u8, PropertyError> {
        match doc.attribute(element, name) {
            Some(text) => text.trim().parse().map_err(|_| PropertyError::InvalidValue {
                property: property.to_string(),
                message: format!("{name} component '{text}' is not 0..255"),
            }),
            None => default.ok_or_else(|| PropertyError::InvalidValue {
                property: property.to_string(),
                message: format!("missing {name} component"),
            }),
        }
    };

    let mut color = Color::rgba(
        component("red", None)?,
        component("green", None)?,
        component("blue", None)?,
        component("alpha", Some(255))?,
    );
    if let Some(name) = doc.attribute(element, "name") {
        color = color.named(name);
    }
    Ok(color)
}

/// Read a macro set: each child element defines one macro.
pub fn read_macros(doc: &Document, element: ElementId) -> Macros {
    doc.children(element)
        .iter()
        .filter(|&&child| doc.tag(child) != INCLUDE_PARENT_MACROS)
        .map(|&child| (doc.tag(child).to_string(), doc.text(child).to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Append `property` as a child element of `parent`. Nested child lists
/// are written from `tree` when given.
pub fn write_property(
    doc: &mut Document,
    parent: ElementId,
    property: &Property,
    tree: Option<&WidgetTree>,
) {
    match property {
        Property::Scalar(scalar) => {
            let element = doc.insert_child(parent, ElementData::new(scalar.name()));
            write_scalar(doc, element, scalar);
        }
        Property::Array(array) => {
            let element = if array.is_inline() {
                parent
            } else {
                doc.insert_child(parent, ElementData::new(array.name()))
            };
            for entry in array.elements() {
                write_property(doc, element, entry, tree);
            }
        }
        Property::Struct(structure) => write_struct(doc, parent, structure, tree),
        Property::Children(children) => {
            let element = doc.insert_child(parent, ElementData::new(children.name()));
            if let Some(tree) = tree {
                for &child in children.ids() {
                    super::writer::write_widget(doc, element, tree, child);
                }
            }
        }
    }
}

fn write_struct(
    doc: &mut Document,
    parent: ElementId,
    structure: &StructProperty,
    tree: Option<&WidgetTree>,
) {
    let mut data = ElementData::new(structure.name());
    for &name in structure.attribute_fields() {
        if let Some(scalar) = structure.field(name).and_then(Property::as_scalar) {
            data.set_attribute(scalar.name(), scalar.specification());
        }
    }
    let element = doc.insert_child(parent, data);
    if let Some(scalar) = structure
        .content_field()
        .and_then(|name| structure.field(name))
        .and_then(Property::as_scalar)
    {
        write_scalar(doc, element, scalar);
    }

    for field in structure.fields() {
        let name = field.name();
        if structure.is_attribute_field(name)
            || structure.content_field() == Some(name)
            || field.is_runtime()
            || field.is_default()
        {
            continue;
        }
        match field {
            Property::Scalar(scalar) if structure.is_markup_field(name) => {
                let child = doc.insert_child(element, ElementData::new(name));
                write_markup(doc, child, scalar);
            }
            _ => write_property(doc, element, field, tree),
        }
    }
}

/// Write a text value as element markup when it parses as such, as plain
/// text otherwise.
fn write_markup(doc: &mut Document, element: ElementId, scalar: &ScalarProperty) {
    let text = scalar.specification();
    if text.trim_start().starts_with('<') {
        if let Ok(markup) = Document::parse(&format!("<markup>{text}</markup>")) {
            if let Some(root) = markup.root().filter(|&root| markup.text(root).trim().is_empty()) {
                for &child in markup.children(root) {
                    graft(doc, element, &markup, child);
                }
                return;
            }
        }
    }
    write_scalar(doc, element, scalar);
}

/// Copy the subtree at `id` of `source` under `parent`.
fn graft(doc: &mut Document, parent: ElementId, source: &Document, id: ElementId) {
    let Some(data) = source.get(id) else {
        return;
    };
    let copy = doc.insert_child(parent, data.clone());
    for &child in source.children(id) {
        graft(doc, copy, source, child);
    }
}

/// Write a scalar value into `element`.
pub fn write_scalar(doc: &mut Document, element: ElementId, scalar: &ScalarProperty) {
    match scalar.value() {
        Value::Color(color) => {
            let mut data = ElementData::new("color");
            if let Some(name) = &color.name {
                data.set_attribute("name", name.as_str());
            }
            data.set_attribute("red", color.red.to_string());
            data.set_attribute("green", color.green.to_string());
            data.set_attribute("blue", color.blue.to_string());
            if color.alpha != 255 {
                data.set_attribute("alpha", color.alpha.to_string());
            }
            doc.insert_child(element, data);
        }
        Value::Macros(macros) => {
            for (name, value) in macros.iter() {
                doc.insert_child(element, ElementData::new(name).with_text(value));
            }
        }
        value => {
            if let Some(data) = doc.get_mut(element) {
                data.text = value.to_string();
            }
        }
    }
}

/// Replace the `<name>` child of `element` with the current value of
/// `property`. Used when a rewrite stores migrated values in a fragment.
pub fn persist_property(doc: &mut Document, element: ElementId, property: &Property) {
    while doc.remove_child_element(element, property.name()).is_some() {}
    write_property(doc, element, property, None);
}
