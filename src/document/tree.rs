//! Tree operations: insert, remove, move, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{ElementData, ElementId};

/// Empty slice constant for returning when an element has no children.
const EMPTY_CHILDREN: &[ElementId] = &[];

/// A mutable element tree, backed by a slotmap arena.
///
/// Loaded display files live here while widgets are configured from them.
/// Configurators may restructure the tree (wrap, move, rename) and ask the
/// loader to read a fragment again; ids stay valid across such moves.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) elements: SlotMap<ElementId, ElementData>,
    children: SecondaryMap<ElementId, Vec<ElementId>>,
    parent: SecondaryMap<ElementId, ElementId>,
    root: Option<ElementId>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            elements: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a detached element (no parent).
    ///
    /// If no root has been set yet, this element becomes the root.
    pub fn insert(&mut self, data: ElementData) -> ElementId {
        let id = self.elements.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert an element as the last child of `parent`.
    pub fn insert_child(&mut self, parent: ElementId, data: ElementData) -> ElementId {
        let index = self.children(parent).len();
        self.insert_child_at(parent, index, data)
    }

    /// Insert an element as a child of `parent` at `index` (clamped).
    pub fn insert_child_at(
        &mut self,
        parent: ElementId,
        index: usize,
        data: ElementData,
    ) -> ElementId {
        debug_assert!(
            self.elements.contains_key(parent),
            "parent element does not exist"
        );
        let id = self.elements.insert(data);
        self.children.insert(id, Vec::new());
        if let Some(siblings) = self.children.get_mut(parent) {
            let index = index.min(siblings.len());
            siblings.insert(index, id);
            self.parent.insert(id, parent);
        }
        id
    }

    /// Remove an element and all its descendants.
    ///
    /// Returns the `ElementData` for the removed element, or `None` if it
    /// didn't exist.
    pub fn remove(&mut self, id: ElementId) -> Option<ElementData> {
        if !self.elements.contains_key(id) {
            return None;
        }

        self.detach(id);
        if self.root == Some(id) {
            self.root = None;
        }

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed = None;

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            let data = self.elements.remove(current);
            if current == id {
                removed = data;
            }
        }

        removed
    }

    /// Detach `id` from its parent, keeping its subtree intact.
    ///
    /// Returns the index the element occupied in its former parent.
    pub fn detach(&mut self, id: ElementId) -> Option<usize> {
        let old_parent = self.parent.remove(id)?;
        let siblings = self.children.get_mut(old_parent)?;
        let index = siblings.iter().position(|&child| child == id)?;
        siblings.remove(index);
        Some(index)
    }

    /// Move `node` to become the last child of `new_parent`.
    pub fn reparent(&mut self, node: ElementId, new_parent: ElementId) {
        let index = self.children(new_parent).len();
        self.move_to(node, new_parent, index);
    }

    /// Move `node` under `new_parent` at `index` (clamped). The subtree moves
    /// with it. Moving an element below itself is ignored.
    pub fn move_to(&mut self, node: ElementId, new_parent: ElementId, index: usize) {
        if !self.elements.contains_key(node) || !self.elements.contains_key(new_parent) {
            return;
        }
        if node == new_parent || self.ancestors(new_parent).contains(&node) {
            return;
        }
        self.detach(node);
        if self.root == Some(node) {
            self.root = Some(new_parent);
        }
        if let Some(siblings) = self.children.get_mut(new_parent) {
            let index = index.min(siblings.len());
            siblings.insert(index, node);
            self.parent.insert(node, new_parent);
        }
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: ElementId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// Get the parent of an element, if it has one.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.parent.get(id).copied()
    }

    /// Get the children of an element. Returns an empty slice if the element
    /// has no children or does not exist.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to the root, collecting ancestor ids.
    ///
    /// The returned vec does **not** include `id` itself.
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Immutable access to an element's data.
    pub fn get(&self, id: ElementId) -> Option<&ElementData> {
        self.elements.get(id)
    }

    /// Mutable access to an element's data.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementData> {
        self.elements.get_mut(id)
    }

    /// The current root element, if set.
    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// Explicitly set the root element.
    pub fn set_root(&mut self, id: ElementId) {
        self.root = Some(id);
    }

    /// Number of elements in the document.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether the document contains an element with the given id.
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.elements.contains_key(current) {
                continue;
            }
            result.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
