//! Typed property descriptors.

use std::fmt;
use std::marker::PhantomData;

use super::container::{Property, ScalarProperty};
use super::value::PropertyType;

/// Grouping of properties, in persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Widget,
    Position,
    Display,
    Behavior,
    Misc,
    Runtime,
}

/// Name, category and value type of a scalar property.
///
/// Descriptors are `const`, so widget types declare them once and use them
/// both to create properties and as typed keys for reading and writing
/// values.
pub struct PropertyDescriptor<T> {
    pub category: Category,
    pub name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PropertyDescriptor<T> {
    /// Describe a property.
    pub const fn new(category: Category, name: &'static str) -> Self {
        Self {
            category,
            name,
            _marker: PhantomData,
        }
    }
}

impl<T: PropertyType> PropertyDescriptor<T> {
    /// Create a persisted property with the given default.
    pub fn create(&self, default: T) -> Property {
        Property::Scalar(ScalarProperty::new(
            self.name,
            self.category,
            false,
            T::KIND,
            T::choices(),
            default.into_value(),
        ))
    }

    /// Create a runtime property: never read from or written to files.
    pub fn create_runtime(&self, default: T) -> Property {
        Property::Scalar(ScalarProperty::new(
            self.name,
            Category::Runtime,
            true,
            T::KIND,
            T::choices(),
            default.into_value(),
        ))
    }
}

impl<T> Clone for PropertyDescriptor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PropertyDescriptor<T> {}

impl<T> fmt::Debug for PropertyDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("category", &self.category)
            .field("name", &self.name)
            .finish()
    }
}
