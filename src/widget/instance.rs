//! Widget instances: identity, version and property tree.

use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};

use super::alias::{self, warn_deprecated};
use super::descriptor::WidgetDescriptor;
use super::WidgetId;
use crate::macros::Macros;
use crate::property::common::{self, HEIGHT, MACROS, NAME, WIDTH, X, Y};
use crate::property::{
    find, find_mut, parse_path, ArrayProperty, ChildrenProperty, Property, PropertyDescriptor,
    PropertyError, PropertyType, ScalarProperty, Value,
};
use crate::version::Version;

/// Name of the top-level child list of containers.
pub const CHILDREN: &str = "children";

static NEXT_RUNTIME_ID: AtomicU64 = AtomicU64::new(1);

/// A configured widget.
///
/// Every widget carries the base properties (`name`, `x`, `y`, `width`,
/// `height`, `actions`, `rules`, `scripts`) followed by whatever its descriptor contributes,
/// ordered by category and then by definition order.
#[derive(Debug)]
pub struct Widget {
    descriptor: &'static WidgetDescriptor,
    type_id: String,
    version: Version,
    runtime_id: String,
    properties: Vec<Property>,
}

impl Widget {
    pub(crate) fn new(descriptor: &'static WidgetDescriptor) -> Self {
        let (width, height) = descriptor.default_size;
        let mut properties = vec![
            NAME.create(String::new()),
            X.create(0),
            Y.create(0),
            WIDTH.create(width),
            HEIGHT.create(height),
            common::actions(),
            common::rules(),
            common::scripts(),
        ];
        for contribute in descriptor.properties {
            contribute(&mut properties);
        }
        properties.sort_by_key(Property::category);

        let runtime_id = format!("WD{:x}", NEXT_RUNTIME_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            descriptor,
            type_id: descriptor.type_id.to_string(),
            version: descriptor.version,
            runtime_id,
            properties,
        }
    }

    /// Keep a type id and version other than the descriptor's (builder).
    pub(crate) fn with_identity(mut self, type_id: impl Into<String>, version: Version) -> Self {
        self.type_id = type_id.into();
        self.version = version;
        self
    }

    pub fn descriptor(&self) -> &'static WidgetDescriptor {
        self.descriptor
    }

    /// Type id written to files.
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Version written to files.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Process-unique id, `WD` followed by hex digits.
    pub fn runtime_id(&self) -> &str {
        &self.runtime_id
    }

    /// Widget name.
    pub fn name(&self) -> String {
        self.property(NAME.name)
            .and_then(|p| p.get::<String>().ok())
            .unwrap_or_default()
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Top-level property by exact name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Mutable top-level property by exact name.
    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name() == name)
    }

    /// Property by path, falling back to legacy aliases.
    pub fn lookup(&self, path: &str) -> Result<&Property, PropertyError> {
        let path = self.current_path(path)?;
        find(&self.properties, &path)
    }

    /// Mutable property by path, falling back to legacy aliases. With
    /// `create_elements`, indexed arrays grow to hold the index.
    pub fn lookup_mut(
        &mut self,
        path: &str,
        create_elements: bool,
    ) -> Result<&mut Property, PropertyError> {
        let path = self.current_path(path)?;
        find_mut(&mut self.properties, &path, create_elements)
    }

    /// Translate `path` through the descriptor's aliases when its first
    /// segment is not a property of this widget.
    fn current_path<'p>(&self, path: &'p str) -> Result<Cow<'p, str>, PropertyError> {
        let head = parse_path(path)?[0].name;
        if self.property(head).is_some() {
            return Ok(Cow::Borrowed(path));
        }
        match alias::translate(self.descriptor.aliases, path) {
            Some(current) => {
                warn_deprecated(&self.type_id, path, &current);
                Ok(Cow::Owned(current))
            }
            None => Ok(Cow::Borrowed(path)),
        }
    }

    /// Scalar property by path.
    pub fn scalar(&self, path: &str) -> Result<&ScalarProperty, PropertyError> {
        self.lookup(path)?.scalar()
    }

    /// Typed value of a scalar property.
    pub fn get<T: PropertyType>(&self, descriptor: &PropertyDescriptor<T>) -> Result<T, PropertyError> {
        self.lookup(descriptor.name)?.get()
    }

    /// Set the typed value of a scalar property.
    pub fn set<T: PropertyType>(
        &self,
        descriptor: &PropertyDescriptor<T>,
        value: T,
    ) -> Result<(), PropertyError> {
        self.lookup(descriptor.name)?.set(value)
    }

    /// Array property by exact name.
    pub fn array(&self, name: &str) -> Option<&ArrayProperty> {
        self.property(name).and_then(Property::as_array)
    }

    /// Mutable array property by exact name.
    pub fn array_mut(&mut self, name: &str) -> Option<&mut ArrayProperty> {
        self.property_mut(name).and_then(Property::as_array_mut)
    }

    /// Top-level child list, for containers.
    pub fn children(&self) -> Option<&ChildrenProperty> {
        self.property(CHILDREN).and_then(Property::as_children)
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut ChildrenProperty> {
        self.property_mut(CHILDREN).and_then(Property::as_children_mut)
    }

    /// Whether this widget has a top-level child list.
    pub fn is_container(&self) -> bool {
        self.children().is_some()
    }

    /// Every child id, including those held in nested structures such as tabs.
    pub fn child_ids(&self) -> Vec<WidgetId> {
        let mut ids = Vec::new();
        for property in &self.properties {
            property.collect_child_ids(&mut ids);
        }
        ids
    }

    pub(crate) fn remove_child_id(&mut self, child: WidgetId) -> bool {
        self.properties
            .iter_mut()
            .any(|property| property.remove_child_id(child))
    }

    /// Value of the widget's own `macros` property, if it has one.
    pub fn own_macros(&self) -> Option<Macros> {
        self.property(MACROS.name)?.get().ok()
    }

    /// Persisted scalar values as `(path, value)`, depth first.
    pub fn persisted_values(&self) -> Vec<(String, Value)> {
        let mut out = Vec::new();
        for property in &self.properties {
            collect_values(property, property.name().to_string(), &mut out);
        }
        out
    }
}

fn collect_values(property: &Property, path: String, out: &mut Vec<(String, Value)>) {
    match property {
        Property::Scalar(scalar) => {
            if !property.is_runtime() {
                out.push((path, scalar.value()));
            }
        }
        Property::Array(array) => {
            for (i, element) in array.elements().iter().enumerate() {
                collect_values(element, format!("{path}[{i}]"), out);
            }
        }
        Property::Struct(structure) => {
            for field in structure.fields() {
                collect_values(field, format!("{path}.{}", field.name()), out);
            }
        }
        Property::Children(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Category;
    use crate::widget::{PropertyAlias, WidgetCategory};

    const LEVEL: PropertyDescriptor<i64> = PropertyDescriptor::new(Category::Display, "level");

    fn level(properties: &mut Vec<Property>) {
        properties.push(LEVEL.create(3));
        properties.push(Property::Children(ChildrenProperty::new(CHILDREN)));
    }

    static SAMPLE: WidgetDescriptor = WidgetDescriptor {
        type_id: "sample",
        legacy_ids: &[],
        label: "Sample",
        category: WidgetCategory::Misc,
        version: Version::new(2, 0, 0),
        default_size: (40, 10),
        properties: &[level],
        configurator: &[],
        aliases: &[PropertyAlias::Rename {
            legacy: "old_level",
            current: "level",
        }],
        macro_scope: crate::widget::inherit_macros,
    };

    #[test]
    fn base_properties_come_first() {
        let widget = SAMPLE.create_widget();
        let names: Vec<&str> = widget.properties().iter().map(Property::name).collect();
        assert_eq!(
            names,
            vec![
                "name", "children", "x", "y", "width", "height", "level", "actions", "rules",
                "scripts"
            ]
        );
        assert_eq!(widget.get(&WIDTH).unwrap(), 40);
        assert_eq!(widget.get(&HEIGHT).unwrap(), 10);
    }

    #[test]
    fn runtime_ids_are_unique() {
        let a = SAMPLE.create_widget();
        let b = SAMPLE.create_widget();
        assert!(a.runtime_id().starts_with("WD"));
        assert_ne!(a.runtime_id(), b.runtime_id());
    }

    #[test]
    fn typed_access() {
        let widget = SAMPLE.create_widget();
        widget.set(&LEVEL, 9).unwrap();
        assert_eq!(widget.get(&LEVEL).unwrap(), 9);
        assert!(widget.is_container());
    }

    #[test]
    fn alias_lookup_reaches_current_property() {
        let widget = SAMPLE.create_widget();
        widget.lookup("old_level").unwrap().set(5i64).unwrap();
        assert_eq!(widget.get(&LEVEL).unwrap(), 5);
        assert!(matches!(
            widget.lookup("no_such"),
            Err(PropertyError::UnknownProperty(_))
        ));
    }

    #[test]
    fn persisted_values_skip_children() {
        let widget = SAMPLE.create_widget();
        let paths: Vec<String> = widget.persisted_values().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["name", "x", "y", "width", "height", "level"]);
    }
}
