//! Element queries: child lookup by tag, typed text accessors.
//!
//! Legacy translations mostly ask "does this fragment have a `<foo>` child,
//! and what does it say?". These helpers answer that without callers
//! touching the arena directly.

use super::node::{ElementData, ElementId};
use super::tree::Document;

/// Errors raised when a child element's text does not parse as requested.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("<{tag}> is not a number: '{text}'")]
    InvalidNumber { tag: String, text: String },
}

impl Document {
    /// Tag of an element, or `""` when it does not exist.
    pub fn tag(&self, id: ElementId) -> &str {
        self.get(id).map(|data| data.tag.as_str()).unwrap_or("")
    }

    /// Text content of an element, or `""` when it does not exist.
    pub fn text(&self, id: ElementId) -> &str {
        self.get(id).map(|data| data.text.as_str()).unwrap_or("")
    }

    /// Attribute value of an element.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id)?.attribute(name)
    }

    /// Set an attribute on an element. Ignored when the element does not exist.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        if let Some(data) = self.get_mut(id) {
            data.set_attribute(name, value);
        }
    }

    /// Remove an attribute from an element.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> Option<String> {
        self.get_mut(id)?.remove_attribute(name)
    }

    /// First direct child of `parent` with the given tag.
    pub fn child_element(&self, parent: ElementId, tag: &str) -> Option<ElementId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.tag(child) == tag)
    }

    /// All direct children of `parent` with the given tag, in document order.
    pub fn child_elements(&self, parent: ElementId, tag: &str) -> Vec<ElementId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|&child| self.tag(child) == tag)
            .collect()
    }

    /// Trimmed text of the first `<tag>` child.
    pub fn child_string(&self, parent: ElementId, tag: &str) -> Option<&str> {
        self.child_element(parent, tag)
            .map(|child| self.text(child).trim())
    }

    /// Boolean text of the first `<tag>` child. Anything but `true` is false.
    pub fn child_bool(&self, parent: ElementId, tag: &str) -> Option<bool> {
        self.child_string(parent, tag)
            .map(|text| text.eq_ignore_ascii_case("true"))
    }

    /// Integer text of the first `<tag>` child.
    pub fn child_int(&self, parent: ElementId, tag: &str) -> Result<Option<i64>, QueryError> {
        let Some(text) = self.child_string(parent, tag) else {
            return Ok(None);
        };
        text.parse()
            .map(Some)
            .map_err(|_| QueryError::InvalidNumber {
                tag: tag.to_string(),
                text: text.to_string(),
            })
    }

    /// Floating point text of the first `<tag>` child.
    pub fn child_double(&self, parent: ElementId, tag: &str) -> Result<Option<f64>, QueryError> {
        let Some(text) = self.child_string(parent, tag) else {
            return Ok(None);
        };
        text.parse()
            .map(Some)
            .map_err(|_| QueryError::InvalidNumber {
                tag: tag.to_string(),
                text: text.to_string(),
            })
    }

    /// Set the text of the first `<tag>` child, creating it when missing.
    pub fn update_child_text(
        &mut self,
        parent: ElementId,
        tag: &str,
        text: impl Into<String>,
    ) -> ElementId {
        let text = text.into();
        match self.child_element(parent, tag) {
            Some(child) => {
                if let Some(data) = self.get_mut(child) {
                    data.text = text;
                }
                child
            }
            None => self.insert_child(parent, ElementData::new(tag).with_text(text)),
        }
    }

    /// Remove the first `<tag>` child, returning its data.
    pub fn remove_child_element(&mut self, parent: ElementId, tag: &str) -> Option<ElementData> {
        let child = self.child_element(parent, tag)?;
        self.remove(child)
    }

    /// Find elements anywhere below `start` (inclusive) matching a predicate.
    pub fn query_all(
        &self,
        start: ElementId,
        predicate: impl Fn(&ElementData) -> bool,
    ) -> Vec<ElementId> {
        self.walk_depth_first(start)
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(&predicate))
            .collect()
    }
}
