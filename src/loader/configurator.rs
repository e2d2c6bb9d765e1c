//! Configurator chains.
//!
//! A widget type's configurator is a list of steps run in order against a
//! freshly created widget and the fragment it is being loaded from. Each
//! step may continue, refuse the fragment (the loader then tries the next
//! candidate type), or report that it rewrote the document and the loader
//! should read the replacement fragment instead.

use super::io::read_property;
use super::reader::Loader;
use super::LoadError;
use crate::document::{Document, ElementId, WIDGET_TAG};
use crate::property::{Property, PropertyDescriptor, PropertyType};
use crate::version::Version;
use crate::widget::Widget;

/// Result of one configurator step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Run the next step.
    Continue,
    /// This type does not take the fragment.
    Refuse,
    /// The document was rewritten; read `replacement` instead.
    Reparse {
        replacement: ElementId,
        reason: &'static str,
    },
}

/// Result of a whole configurator chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Refused,
    Reparse {
        replacement: ElementId,
        reason: &'static str,
    },
}

/// One configurator step.
pub type ConfigureStep = fn(&mut ConfigureContext<'_>) -> Result<Step, LoadError>;

/// State shared by the steps of one configuration attempt.
pub struct ConfigureContext<'l> {
    pub loader: &'l mut Loader,
    pub widget: &'l mut Widget,
    /// Fragment being read.
    pub element: ElementId,
    /// Version the fragment was written with.
    pub version: Version,
}

impl ConfigureContext<'_> {
    pub fn document(&self) -> &Document {
        self.loader.document()
    }

    pub fn document_mut(&mut self) -> &mut Document {
        self.loader.document_mut()
    }

    /// Whether the fragment predates major version `major`.
    pub fn older_than(&self, major: u32) -> bool {
        self.version.major < major
    }

    /// Type id as written in the fragment (`type`, or legacy `typeId`).
    pub fn fragment_type(&self) -> Option<&str> {
        let doc = self.document();
        doc.attribute(self.element, "type")
            .or_else(|| doc.attribute(self.element, "typeId"))
    }

    pub fn has_child(&self, tag: &str) -> bool {
        self.document().child_element(self.element, tag).is_some()
    }

    pub fn child_string(&self, tag: &str) -> Option<String> {
        self.document()
            .child_string(self.element, tag)
            .map(str::to_string)
    }

    pub fn child_bool(&self, tag: &str) -> Option<bool> {
        self.document().child_bool(self.element, tag)
    }

    pub fn child_int(&self, tag: &str) -> Result<Option<i64>, LoadError> {
        self.document()
            .child_int(self.element, tag)
            .map_err(|source| self.fragment_error(source))
    }

    pub fn child_double(&self, tag: &str) -> Result<Option<f64>, LoadError> {
        self.document()
            .child_double(self.element, tag)
            .map_err(|source| self.fragment_error(source))
    }

    fn fragment_error(&self, source: crate::document::QueryError) -> LoadError {
        LoadError::Fragment {
            type_id: self.widget.type_id().to_string(),
            source,
        }
    }

    /// Typed value of a property of the widget being configured.
    pub fn get<T: PropertyType>(&self, descriptor: &PropertyDescriptor<T>) -> Result<T, LoadError> {
        self.widget
            .get(descriptor)
            .map_err(|e| LoadError::property(self.widget.type_id(), descriptor.name, e))
    }

    /// Set a property of the widget being configured.
    pub fn set<T: PropertyType>(
        &self,
        descriptor: &PropertyDescriptor<T>,
        value: T,
    ) -> Result<(), LoadError> {
        self.widget
            .set(descriptor, value)
            .map_err(|e| LoadError::property(self.widget.type_id(), descriptor.name, e))
    }

    /// Set the scalar at `path` from text, growing arrays as needed.
    pub fn set_path(&mut self, path: &str, text: &str) -> Result<(), LoadError> {
        let type_id = self.widget.type_id().to_string();
        self.widget
            .lookup_mut(path, true)
            .and_then(|p| p.scalar().and_then(|s| s.set_specification(text)))
            .map_err(|e| LoadError::property(&type_id, path, e))
    }

    /// Read `element` into the property at `path`, growing arrays as needed.
    pub fn read_path(&mut self, path: &str, element: ElementId) -> Result<(), LoadError> {
        let type_id = self.widget.type_id().to_string();
        let property = self
            .widget
            .lookup_mut(path, true)
            .map_err(|e| LoadError::property(&type_id, path, e))?;
        read_property(self.loader, &type_id, property, element)
    }
}

/// Run `steps` in order until one refuses or requests a re-parse.
pub fn run(steps: &[ConfigureStep], ctx: &mut ConfigureContext<'_>) -> Result<Outcome, LoadError> {
    for step in steps {
        match step(&mut *ctx)? {
            Step::Continue => {}
            Step::Refuse => return Ok(Outcome::Refused),
            Step::Reparse {
                replacement,
                reason,
            } => {
                return Ok(Outcome::Reparse {
                    replacement,
                    reason,
                })
            }
        }
    }
    Ok(Outcome::Accepted)
}

/// Read every child element named like a persisted property of the widget.
///
/// Unknown elements are skipped, as are nested `<widget>` fragments and
/// the top-level child list; the loader reads those after acceptance.
pub fn import_properties(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    let type_id = ctx.widget.type_id().to_string();
    for (tag, child) in property_elements(ctx) {
        let Some(property) = ctx.widget.property_mut(&tag) else {
            continue;
        };
        if property.is_runtime() || matches!(property, Property::Children(_)) {
            continue;
        }
        read_property(ctx.loader, &type_id, property, child)?;
    }
    Ok(Step::Continue)
}

/// Like [`import_properties`], but a property that fails to read keeps its
/// default and the error is only logged.
pub fn import_properties_leniently(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    let type_id = ctx.widget.type_id().to_string();
    for (tag, child) in property_elements(ctx) {
        let Some(property) = ctx.widget.property_mut(&tag) else {
            continue;
        };
        if property.is_runtime() || matches!(property, Property::Children(_)) {
            continue;
        }
        if let Err(error) = read_property(ctx.loader, &type_id, property, child) {
            tracing::debug!(type_id = %type_id, %error, "keeping default");
        }
    }
    Ok(Step::Continue)
}

fn property_elements(ctx: &ConfigureContext<'_>) -> Vec<(String, ElementId)> {
    let doc = ctx.document();
    doc.children(ctx.element)
        .iter()
        .copied()
        .filter(|&child| doc.tag(child) != WIDGET_TAG)
        .map(|child| (doc.tag(child).to_string(), child))
        .collect()
}
