//! Descriptor registry: maps persisted type ids to candidate descriptors.

use std::sync::{Arc, LazyLock};

use super::descriptor::WidgetDescriptor;

/// Errors from registering descriptors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("widget type '{0}' is already registered")]
    Duplicate(String),
}

/// Registered widget types, in registration order.
///
/// Several descriptors may claim the same legacy id. Resolution returns the
/// exact type match first, then every descriptor listing the id as legacy,
/// in registration order; the loader tries them until one accepts.
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    descriptors: Vec<&'static WidgetDescriptor>,
}

static SHARED: LazyLock<Arc<WidgetRegistry>> =
    LazyLock::new(|| Arc::new(WidgetRegistry::with_defaults()));

impl WidgetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in widget type.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for descriptor in crate::widgets::builtin() {
            registry.descriptors.push(descriptor);
        }
        registry
    }

    /// Process-wide registry of built-in types.
    pub fn shared() -> Arc<WidgetRegistry> {
        Arc::clone(&SHARED)
    }

    /// Register a descriptor. Current type ids must be unique.
    pub fn register(&mut self, descriptor: &'static WidgetDescriptor) -> Result<(), RegistryError> {
        if self.get(descriptor.type_id).is_some() {
            return Err(RegistryError::Duplicate(descriptor.type_id.to_string()));
        }
        tracing::debug!(type_id = descriptor.type_id, "registered widget type");
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Descriptor whose current type id is `type_id`.
    pub fn get(&self, type_id: &str) -> Option<&'static WidgetDescriptor> {
        self.descriptors
            .iter()
            .copied()
            .find(|d| d.type_id == type_id)
    }

    /// Candidates for a persisted type id: exact match first, then legacy
    /// claimants in registration order. Empty when nothing claims it.
    pub fn resolve(&self, type_id: &str) -> Vec<&'static WidgetDescriptor> {
        let mut candidates: Vec<_> = self.get(type_id).into_iter().collect();
        candidates.extend(
            self.descriptors
                .iter()
                .copied()
                .filter(|d| d.type_id != type_id && d.legacy_ids.iter().any(|id| *id == type_id)),
        );
        candidates
    }

    /// All descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static WidgetDescriptor> + '_ {
        self.descriptors.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
