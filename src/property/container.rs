//! Property containers: scalar, array, structure and child-widget list.

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::descriptor::Category;
use super::value::{PropertyType, Value, ValueKind};
use super::PropertyError;
use crate::macros::{expand, MacroLookup};
use crate::widget::WidgetId;

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

/// A node of a widget's property tree.
#[derive(Debug)]
pub enum Property {
    Scalar(ScalarProperty),
    Array(ArrayProperty),
    Struct(StructProperty),
    Children(ChildrenProperty),
}

impl Property {
    /// Property name, unique among its siblings.
    pub fn name(&self) -> &'static str {
        match self {
            Property::Scalar(p) => p.name,
            Property::Array(p) => p.name,
            Property::Struct(p) => p.name,
            Property::Children(p) => p.name,
        }
    }

    /// Category used for ordering.
    pub fn category(&self) -> Category {
        match self {
            Property::Scalar(p) => p.category,
            Property::Array(p) => p.category,
            Property::Struct(p) => p.category,
            Property::Children(_) => Category::Widget,
        }
    }

    /// Runtime properties are never persisted.
    pub fn is_runtime(&self) -> bool {
        matches!(self, Property::Scalar(p) if p.runtime)
    }

    /// Whether the property still holds its default.
    pub fn is_default(&self) -> bool {
        match self {
            Property::Scalar(p) => p.is_default(),
            Property::Array(p) => p.is_default(),
            Property::Struct(p) => p.is_default(),
            Property::Children(p) => p.is_empty(),
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarProperty> {
        match self {
            Property::Scalar(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayProperty> {
        match self {
            Property::Array(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayProperty> {
        match self {
            Property::Array(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructProperty> {
        match self {
            Property::Struct(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut StructProperty> {
        match self {
            Property::Struct(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_children(&self) -> Option<&ChildrenProperty> {
        match self {
            Property::Children(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_children_mut(&mut self) -> Option<&mut ChildrenProperty> {
        match self {
            Property::Children(p) => Some(p),
            _ => None,
        }
    }

    /// Scalar view, or [`PropertyError::NotScalar`].
    pub fn scalar(&self) -> Result<&ScalarProperty, PropertyError> {
        self.as_scalar()
            .ok_or_else(|| PropertyError::NotScalar(self.name().to_string()))
    }

    /// Typed value of a scalar property.
    pub fn get<T: PropertyType>(&self) -> Result<T, PropertyError> {
        self.scalar()?.get()
    }

    /// Set the typed value of a scalar property.
    pub fn set<T: PropertyType>(&self, value: T) -> Result<(), PropertyError> {
        self.scalar()?.set(value.into_value())
    }

    /// Every child widget id held anywhere below this property, in order.
    pub fn collect_child_ids(&self, out: &mut Vec<WidgetId>) {
        match self {
            Property::Scalar(_) => {}
            Property::Array(p) => p.elements.iter().for_each(|e| e.collect_child_ids(out)),
            Property::Struct(p) => p.fields.iter().for_each(|f| f.collect_child_ids(out)),
            Property::Children(p) => out.extend_from_slice(&p.children),
        }
    }

    /// Remove `child` from whichever children list below this property holds it.
    pub fn remove_child_id(&mut self, child: WidgetId) -> bool {
        match self {
            Property::Scalar(_) => false,
            Property::Array(p) => p.elements.iter_mut().any(|e| e.remove_child_id(child)),
            Property::Struct(p) => p.fields.iter_mut().any(|f| f.remove_child_id(child)),
            Property::Children(p) => p.remove(child).is_some(),
        }
    }
}

// ---------------------------------------------------------------------------
// ScalarProperty
// ---------------------------------------------------------------------------

/// A single typed value.
///
/// Values are published by replacement, so readers holding `&self` always
/// see a complete value. Text values are kept as written; macro references
/// in them are expanded on demand by [`ScalarProperty::resolve`].
#[derive(Debug)]
pub struct ScalarProperty {
    name: &'static str,
    category: Category,
    runtime: bool,
    kind: ValueKind,
    choices: &'static [&'static str],
    default: Value,
    value: ArcSwap<Value>,
}

impl ScalarProperty {
    pub(crate) fn new(
        name: &'static str,
        category: Category,
        runtime: bool,
        kind: ValueKind,
        choices: &'static [&'static str],
        default: Value,
    ) -> Self {
        Self {
            name,
            category,
            runtime,
            kind,
            choices,
            value: ArcSwap::from_pointee(default.clone()),
            default,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Choice names of an enumerated property.
    pub fn choices(&self) -> &'static [&'static str] {
        self.choices
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Current value, unexpanded.
    pub fn value(&self) -> Value {
        Value::clone(&self.value.load())
    }

    /// Typed current value.
    pub fn get<T: PropertyType>(&self) -> Result<T, PropertyError> {
        let value = self.value.load();
        T::from_value(&value).ok_or_else(|| PropertyError::TypeMismatch {
            property: self.name.to_string(),
            expected: T::KIND,
            actual: self.kind,
        })
    }

    /// Replace the value. The kind must match; enum ordinals must be in range.
    pub fn set(&self, value: Value) -> Result<(), PropertyError> {
        if value.kind() != self.kind {
            return Err(PropertyError::TypeMismatch {
                property: self.name.to_string(),
                expected: self.kind,
                actual: value.kind(),
            });
        }
        if let Value::Enum(ordinal) = value {
            if ordinal >= self.choices.len() {
                return Err(PropertyError::InvalidValue {
                    property: self.name.to_string(),
                    message: format!("ordinal {ordinal} out of range 0..{}", self.choices.len()),
                });
            }
        }
        self.value.store(Arc::new(value));
        Ok(())
    }

    /// Textual form of the value as a user would write it.
    pub fn specification(&self) -> String {
        self.value.load().to_string()
    }

    /// Set the value from its textual form.
    pub fn set_specification(&self, text: &str) -> Result<(), PropertyError> {
        let value = match self.kind {
            ValueKind::Text => Value::Text(text.to_string()),
            kind => Value::parse(kind, text, self.choices).map_err(|message| {
                PropertyError::InvalidValue {
                    property: self.name.to_string(),
                    message,
                }
            })?,
        };
        self.set(value)
    }

    /// Current value with macro references expanded (text values only).
    pub fn resolve(&self, macros: &dyn MacroLookup) -> Value {
        match &**self.value.load() {
            Value::Text(text) => Value::Text(expand(text, macros)),
            other => other.clone(),
        }
    }

    /// Restore the default value.
    pub fn reset(&self) {
        self.value.store(Arc::new(self.default.clone()));
    }

    pub fn is_default(&self) -> bool {
        **self.value.load() == self.default
    }
}

// ---------------------------------------------------------------------------
// ArrayProperty
// ---------------------------------------------------------------------------

/// Creates the element at a given index.
pub type ElementFactory = fn(usize) -> Property;

/// Largest number of elements any array property holds. Counts read from
/// documents beyond this are rejected instead of allocated.
pub const MAX_ARRAY_SIZE: usize = 1000;

/// An ordered list of same-shaped elements built by a factory.
#[derive(Debug)]
pub struct ArrayProperty {
    name: &'static str,
    category: Category,
    factory: ElementFactory,
    minimum_size: usize,
    default_size: usize,
    inline: bool,
    elements: Vec<Property>,
}

impl ArrayProperty {
    /// Create an array holding `default_size` factory elements.
    pub fn new(
        name: &'static str,
        category: Category,
        factory: ElementFactory,
        minimum_size: usize,
        default_size: usize,
    ) -> Self {
        let default_size = default_size.max(minimum_size);
        Self {
            name,
            category,
            factory,
            minimum_size,
            default_size,
            inline: false,
            elements: (0..default_size).map(factory).collect(),
        }
    }

    /// Persist the elements directly inside the enclosing element, without
    /// an element of the array's own name (builder).
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// Tag of the persisted elements.
    pub fn element_tag(&self) -> &'static str {
        (self.factory)(0).name()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn size(&self) -> usize {
        self.elements.len()
    }

    pub fn minimum_size(&self) -> usize {
        self.minimum_size
    }

    pub fn elements(&self) -> &[Property] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&Property> {
        self.elements.get(index)
    }

    pub fn element_mut(&mut self, index: usize) -> Option<&mut Property> {
        self.elements.get_mut(index)
    }

    /// Fresh element for `index`, not yet part of the array.
    pub fn create_element(&self, index: usize) -> Property {
        (self.factory)(index)
    }

    /// Append a factory element and return it. Refused at
    /// [`MAX_ARRAY_SIZE`].
    pub fn add_element(&mut self) -> Result<&mut Property, PropertyError> {
        self.check_maximum(self.elements.len() + 1)?;
        let element = (self.factory)(self.elements.len());
        self.elements.push(element);
        let last = self.elements.len() - 1;
        Ok(&mut self.elements[last])
    }

    /// Remove the last element. Refused at the minimum size.
    pub fn remove_element(&mut self) -> Result<Property, PropertyError> {
        if self.elements.len() <= self.minimum_size {
            return Err(PropertyError::MinimumSize {
                property: self.name.to_string(),
                minimum: self.minimum_size,
            });
        }
        self.elements.pop().ok_or_else(|| PropertyError::MinimumSize {
            property: self.name.to_string(),
            minimum: self.minimum_size,
        })
    }

    /// Grow or shrink to `size` elements.
    pub fn resize(&mut self, size: usize) -> Result<(), PropertyError> {
        if size < self.minimum_size {
            return Err(PropertyError::MinimumSize {
                property: self.name.to_string(),
                minimum: self.minimum_size,
            });
        }
        self.check_maximum(size)?;
        self.elements.truncate(size);
        while self.elements.len() < size {
            let element = (self.factory)(self.elements.len());
            self.elements.push(element);
        }
        Ok(())
    }

    /// Replace all elements. Missing elements up to the minimum size are
    /// filled from the factory.
    pub fn set_elements(&mut self, elements: Vec<Property>) -> Result<(), PropertyError> {
        self.check_maximum(elements.len())?;
        self.elements = elements;
        while self.elements.len() < self.minimum_size {
            let element = (self.factory)(self.elements.len());
            self.elements.push(element);
        }
        Ok(())
    }

    fn check_maximum(&self, size: usize) -> Result<(), PropertyError> {
        if size > MAX_ARRAY_SIZE {
            return Err(PropertyError::MaximumSize {
                property: self.name.to_string(),
                maximum: MAX_ARRAY_SIZE,
                requested: size,
            });
        }
        Ok(())
    }

    pub fn is_default(&self) -> bool {
        self.elements.len() == self.default_size && self.elements.iter().all(Property::is_default)
    }
}

// ---------------------------------------------------------------------------
// StructProperty
// ---------------------------------------------------------------------------

/// A fixed set of named fields.
///
/// Fields are persisted as child elements unless marked otherwise: as an
/// attribute of the structure's element, as its text content, or as a
/// child element whose content may be element markup.
#[derive(Debug)]
pub struct StructProperty {
    name: &'static str,
    category: Category,
    fields: Vec<Property>,
    attribute_fields: Vec<&'static str>,
    content_field: Option<&'static str>,
    markup_fields: Vec<&'static str>,
}

impl StructProperty {
    pub fn new(name: &'static str, category: Category, fields: Vec<Property>) -> Self {
        Self {
            name,
            category,
            fields,
            attribute_fields: Vec::new(),
            content_field: None,
            markup_fields: Vec::new(),
        }
    }

    /// Persist the named scalar field as an XML attribute (builder).
    pub fn with_attribute_field(mut self, field: &'static str) -> Self {
        self.attribute_fields.push(field);
        self
    }

    /// Persist the named scalar field as the element's own text (builder).
    pub fn with_content_field(mut self, field: &'static str) -> Self {
        self.content_field = Some(field);
        self
    }

    /// Persist the named text field as a child element whose content is
    /// kept as markup when it holds elements (builder).
    pub fn with_markup_field(mut self, field: &'static str) -> Self {
        self.markup_fields.push(field);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fields persisted as attributes, in order.
    pub fn attribute_fields(&self) -> &[&'static str] {
        &self.attribute_fields
    }

    pub fn is_attribute_field(&self, field: &str) -> bool {
        self.attribute_fields.iter().any(|f| *f == field)
    }

    /// Field persisted as the element's text, if any.
    pub fn content_field(&self) -> Option<&'static str> {
        self.content_field
    }

    pub fn is_markup_field(&self, field: &str) -> bool {
        self.markup_fields.iter().any(|f| *f == field)
    }

    pub fn fields(&self) -> &[Property] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [Property] {
        &mut self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Property> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.fields.iter_mut().find(|f| f.name() == name)
    }

    pub fn is_default(&self) -> bool {
        self.fields.iter().all(Property::is_default)
    }
}

// ---------------------------------------------------------------------------
// ChildrenProperty
// ---------------------------------------------------------------------------

/// Ordered child widgets of a container.
#[derive(Debug, Default)]
pub struct ChildrenProperty {
    name: &'static str,
    children: Vec<WidgetId>,
}

impl ChildrenProperty {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ids(&self) -> &[WidgetId] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.children.contains(&id)
    }

    pub(crate) fn push(&mut self, id: WidgetId) {
        self.children.push(id);
    }

    pub(crate) fn insert(&mut self, index: usize, id: WidgetId) {
        let index = index.min(self.children.len());
        self.children.insert(index, id);
    }

    pub(crate) fn remove(&mut self, id: WidgetId) -> Option<usize> {
        let index = self.children.iter().position(|&c| c == id)?;
        self.children.remove(index);
        Some(index)
    }

    pub(crate) fn set(&mut self, ids: Vec<WidgetId>) {
        self.children = ids;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyDescriptor;

    const VALUE: PropertyDescriptor<i64> = PropertyDescriptor::new(Category::Behavior, "value");
    const LABEL: PropertyDescriptor<String> = PropertyDescriptor::new(Category::Display, "label");

    fn state(index: usize) -> Property {
        Property::Struct(StructProperty::new(
            "state",
            Category::Behavior,
            vec![
                VALUE.create(index as i64),
                LABEL.create(format!("State {}", index + 1)),
            ],
        ))
    }

    fn states() -> ArrayProperty {
        ArrayProperty::new("states", Category::Behavior, state, 2, 2)
    }

    #[test]
    fn scalar_set_checks_kind() {
        let property = VALUE.create(1);
        let scalar = property.as_scalar().unwrap();
        assert!(scalar.set(Value::Int(5)).is_ok());
        assert_eq!(scalar.get::<i64>().unwrap(), 5);
        assert!(matches!(
            scalar.set(Value::Text("x".into())),
            Err(PropertyError::TypeMismatch { .. })
        ));
        assert!(matches!(
            scalar.get::<String>(),
            Err(PropertyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn scalar_default_tracking() {
        let property = VALUE.create(1);
        assert!(property.is_default());
        property.set(2i64).unwrap();
        assert!(!property.is_default());
        property.as_scalar().unwrap().reset();
        assert!(property.is_default());
    }

    #[test]
    fn specification_parses_by_kind() {
        let property = VALUE.create(0);
        let scalar = property.as_scalar().unwrap();
        scalar.set_specification("12").unwrap();
        assert_eq!(scalar.value(), Value::Int(12));
        assert!(matches!(
            scalar.set_specification("twelve"),
            Err(PropertyError::InvalidValue { .. })
        ));
    }

    #[test]
    fn text_resolves_against_macros() {
        let property = LABEL.create("$(P)".into());
        let scalar = property.as_scalar().unwrap();
        let macros = crate::macros::Macros::new().with("P", "pump");
        assert_eq!(scalar.resolve(&macros), Value::Text("pump".into()));
        assert_eq!(scalar.specification(), "$(P)");
    }

    #[test]
    fn array_elements_come_from_factory() {
        let array = states();
        assert_eq!(array.size(), 2);
        let second = array.element(1).unwrap().as_struct().unwrap();
        assert_eq!(second.field("value").unwrap().get::<i64>().unwrap(), 1);
        assert_eq!(
            second.field("label").unwrap().get::<String>().unwrap(),
            "State 2"
        );
        assert!(array.is_default());
    }

    #[test]
    fn array_respects_minimum_size() {
        let mut array = states();
        array.add_element().unwrap();
        assert_eq!(array.size(), 3);
        assert!(!array.is_default());
        assert!(array.remove_element().is_ok());
        assert!(matches!(
            array.remove_element(),
            Err(PropertyError::MinimumSize { minimum: 2, .. })
        ));
        assert!(array.resize(1).is_err());
        array.resize(4).unwrap();
        assert_eq!(array.size(), 4);
    }

    #[test]
    fn set_elements_pads_to_minimum() {
        let mut array = states();
        array.set_elements(Vec::new()).unwrap();
        assert_eq!(array.size(), 2);
    }

    #[test]
    fn array_respects_maximum_size() {
        let mut array = states();
        array.resize(MAX_ARRAY_SIZE).unwrap();
        assert_eq!(array.size(), MAX_ARRAY_SIZE);
        assert!(matches!(
            array.add_element(),
            Err(PropertyError::MaximumSize { maximum: MAX_ARRAY_SIZE, .. })
        ));
        assert!(matches!(
            array.resize(MAX_ARRAY_SIZE + 1),
            Err(PropertyError::MaximumSize { requested, .. }) if requested == MAX_ARRAY_SIZE + 1
        ));
        assert_eq!(array.size(), MAX_ARRAY_SIZE);
    }
}
