//! Typed property trees.
//!
//! A widget's state is a list of [`Property`] nodes: scalars holding one
//! [`Value`], arrays of factory-built elements, fixed structures, and the
//! child-widget list of containers. [`PropertyDescriptor`]s are the typed
//! keys used to create properties and to read or write their values.

pub mod common;
pub mod container;
pub mod descriptor;
pub mod path;
pub mod value;

pub use container::{
    ArrayProperty, ChildrenProperty, ElementFactory, Property, ScalarProperty, StructProperty,
    MAX_ARRAY_SIZE,
};
pub use descriptor::{Category, PropertyDescriptor};
pub use path::{find, find_mut, parse_path, PathSegment};
pub use value::{Color, PropertyType, Value, ValueKind};

/// Errors from property access and updates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    #[error("unknown property: {0}")]
    UnknownProperty(String),
    #[error("invalid value for {property}: {message}")]
    InvalidValue { property: String, message: String },
    #[error("{property} holds {actual:?} values, not {expected:?}")]
    TypeMismatch {
        property: String,
        expected: ValueKind,
        actual: ValueKind,
    },
    #[error("index {index} out of bounds for {property} with {size} elements")]
    IndexOutOfBounds {
        property: String,
        index: usize,
        size: usize,
    },
    #[error("{property} needs at least {minimum} elements")]
    MinimumSize { property: String, minimum: usize },
    #[error("{property} holds at most {maximum} elements, {requested} requested")]
    MaximumSize {
        property: String,
        maximum: usize,
        requested: usize,
    },
    #[error("invalid property path '{path}': {message}")]
    InvalidPath { path: String, message: String },
    #[error("{0} is not a scalar property")]
    NotScalar(String),
}
