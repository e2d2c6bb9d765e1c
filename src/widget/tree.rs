//! Widget tree: slotmap arena of configured widgets with parent links.

use std::collections::VecDeque;

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use super::instance::Widget;
use crate::macros::{expand, MacroLookup, Macros};
use crate::property::{PropertyDescriptor, PropertyError};

new_key_type! {
    /// Unique identifier for a widget in a [`WidgetTree`].
    pub struct WidgetId;
}

/// Errors from structural tree edits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("no such widget")]
    UnknownWidget,
    #[error("widget type '{0}' cannot hold children")]
    NotAContainer(String),
    #[error("widget already has a parent")]
    AlreadyAttached,
    #[error("widget cannot become its own descendant")]
    Cycle,
    #[error("widget is not a child of the given parent")]
    NotAChild,
    #[error(transparent)]
    Property(#[from] PropertyError),
}

/// All widgets of a display.
///
/// Child lists live in the widgets' own children properties (including
/// those nested in structures such as tabs); the tree mirrors them with
/// parent links so scopes can be walked upward.
#[derive(Debug, Default)]
pub struct WidgetTree {
    widgets: SlotMap<WidgetId, Widget>,
    parent: SecondaryMap<WidgetId, WidgetId>,
    root: Option<WidgetId>,
    preference_macros: Macros,
}

impl WidgetTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree whose outermost macro scope is `macros`.
    pub fn with_preference_macros(macros: Macros) -> Self {
        Self {
            preference_macros: macros,
            ..Self::default()
        }
    }

    /// Macros every display starts from.
    pub fn preference_macros(&self) -> &Macros {
        &self.preference_macros
    }

    /// Insert a widget. Ids already listed in its children properties get
    /// their parent link set.
    pub fn insert(&mut self, widget: Widget) -> WidgetId {
        let children = widget.child_ids();
        let id = self.widgets.insert(widget);
        for child in children {
            self.parent.insert(child, id);
        }
        id
    }

    /// Append `child` to the top-level child list of `parent`.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<(), TreeError> {
        let index = self
            .get(parent)
            .and_then(Widget::children)
            .map(|c| c.len())
            .unwrap_or(0);
        self.insert_child(parent, index, child)
    }

    /// Insert `child` into the top-level child list of `parent` at `index`.
    pub fn insert_child(
        &mut self,
        parent: WidgetId,
        index: usize,
        child: WidgetId,
    ) -> Result<(), TreeError> {
        if !self.contains(child) {
            return Err(TreeError::UnknownWidget);
        }
        if self.parent.contains_key(child) {
            return Err(TreeError::AlreadyAttached);
        }
        if child == parent || self.ancestors(parent).contains(&child) {
            return Err(TreeError::Cycle);
        }
        let widget = self.widgets.get_mut(parent).ok_or(TreeError::UnknownWidget)?;
        let type_id = widget.type_id().to_string();
        let children = widget
            .children_mut()
            .ok_or(TreeError::NotAContainer(type_id))?;
        children.insert(index, child);
        self.parent.insert(child, parent);
        Ok(())
    }

    /// Detach `child` from `parent`. The child stays in the arena.
    /// Returns the index it occupied.
    pub fn remove_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<usize, TreeError> {
        if self.parent(child) != Some(parent) {
            return Err(TreeError::NotAChild);
        }
        let widget = self.widgets.get_mut(parent).ok_or(TreeError::UnknownWidget)?;
        let index = widget
            .children_mut()
            .and_then(|children| children.remove(child))
            .ok_or(TreeError::NotAChild)?;
        self.parent.remove(child);
        Ok(index)
    }

    /// Move `child` within its parent's top-level list to `index`.
    pub fn move_child_to(
        &mut self,
        parent: WidgetId,
        child: WidgetId,
        index: usize,
    ) -> Result<(), TreeError> {
        self.remove_child(parent, child)?;
        self.insert_child(parent, index, child)
    }

    /// Remove a widget and its whole subtree, detaching it from its parent.
    pub fn remove(&mut self, id: WidgetId) -> Option<Widget> {
        if !self.widgets.contains_key(id) {
            return None;
        }
        if let Some(parent) = self.parent.remove(id) {
            if let Some(widget) = self.widgets.get_mut(parent) {
                widget.remove_child_id(id);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }

        let mut queue = VecDeque::from([id]);
        let mut removed = None;
        while let Some(current) = queue.pop_front() {
            self.parent.remove(current);
            if let Some(widget) = self.widgets.remove(current) {
                queue.extend(widget.child_ids());
                if current == id {
                    removed = Some(widget);
                }
            }
        }
        removed
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.parent.get(id).copied()
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent(current) {
            result.push(p);
            current = p;
        }
        result
    }

    /// Children of `id`, including those nested in structures.
    pub fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.get(id).map(Widget::child_ids).unwrap_or_default()
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(id)
    }

    pub fn root(&self) -> Option<WidgetId> {
        self.root
    }

    pub fn set_root(&mut self, id: WidgetId) {
        self.root = Some(id);
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            result.push(current);
            for child in self.children(current).into_iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// First descendant of `start` named `name`, depth first.
    pub fn find_by_name(&self, start: WidgetId, name: &str) -> Option<WidgetId> {
        self.walk_depth_first(start)
            .into_iter()
            .skip(1)
            .find(|&id| self.get(id).is_some_and(|w| w.name() == name))
    }

    // -----------------------------------------------------------------------
    // Macro scopes
    // -----------------------------------------------------------------------

    /// Macros visible to `id`: the preference macros, then each ancestor's
    /// contribution from the root down, then the widget's own.
    pub fn effective_macros(&self, id: WidgetId) -> Macros {
        let inherited = match self.parent(id) {
            Some(parent) => self.effective_macros(parent),
            None => self.preference_macros.clone(),
        };
        match self.get(id) {
            Some(widget) => (widget.descriptor().macro_scope)(widget, inherited),
            None => inherited,
        }
    }

    /// Expand macro references in `text` as seen from `id`. Names that are
    /// not macros fall back to the widget's own scalar properties.
    pub fn expand_text(&self, id: WidgetId, text: &str) -> Result<String, TreeError> {
        let widget = self.get(id).ok_or(TreeError::UnknownWidget)?;
        let scope = WidgetScope {
            macros: self.effective_macros(id),
            widget,
        };
        Ok(expand(text, &scope))
    }

    /// Text property value with macro references expanded.
    pub fn resolve_text(
        &self,
        id: WidgetId,
        descriptor: &PropertyDescriptor<String>,
    ) -> Result<String, TreeError> {
        let widget = self.get(id).ok_or(TreeError::UnknownWidget)?;
        let text = widget.get(descriptor)?;
        self.expand_text(id, &text)
    }
}

/// Macro lookup over a scope with fallback to the widget's properties.
struct WidgetScope<'w> {
    macros: Macros,
    widget: &'w Widget,
}

impl MacroLookup for WidgetScope<'_> {
    fn lookup(&self, name: &str) -> Option<String> {
        if let Some(value) = self.macros.get(name) {
            return Some(value.to_string());
        }
        self.widget
            .property(name)
            .and_then(|p| p.as_scalar())
            .map(|scalar| scalar.specification())
    }
}
