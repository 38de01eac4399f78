//! Scene tree: an ordered forest of elements.
//!
//! Elements live in an arena keyed by [`ElementId`]. Each element keeps an
//! ordered list of child ids plus a non-owning parent back-reference, and
//! the tree keeps the ordered list of roots. Every element is in exactly
//! one collection (the root list or one parent's children) at all times.

use crate::id::{ElementId, IdAllocator};
use crate::model::{ElementKind, Properties};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use thiserror::Error;

/// A node of the scene tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub properties: Properties,
    /// `None` for roots.
    pub parent: Option<ElementId>,
    /// Ordered child ids: later children stack above earlier ones.
    pub children: SmallVec<[ElementId; 4]>,
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        self.properties.kind()
    }

    pub fn name(&self) -> &str {
        &self.properties.common.name
    }
}

/// A detached element together with all of its descendants.
///
/// Produced by [`SceneTree::remove`]; ids, properties and child order are
/// kept so the subtree can be put back with [`SceneTree::insert_at_root`].
#[derive(Debug, Clone, PartialEq)]
pub struct Subtree {
    root: ElementId,
    /// Pre-order, root first.
    elements: Vec<Element>,
}

impl Subtree {
    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.iter().map(|e| e.id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("element {0} not found")]
    NotFound(ElementId),

    #[error("element {0} cannot be its own parent")]
    SelfParent(ElementId),

    #[error("element {child} cannot move under its own descendant {new_parent}")]
    Cycle {
        child: ElementId,
        new_parent: ElementId,
    },

    #[error("element id {0} is already in use")]
    DuplicateId(ElementId),
}

/// The element forest being edited.
#[derive(Debug, Clone)]
pub struct SceneTree {
    elements: HashMap<ElementId, Element>,
    roots: Vec<ElementId>,
    ids: IdAllocator,
}

impl SceneTree {
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: HashMap::new(),
            roots: Vec::new(),
            ids: IdAllocator::new(),
        }
    }

    /// Create an element of `kind` with its defaults, named `{Kind}{id}`,
    /// and append it to the root forest.
    pub fn add(&mut self, kind: ElementKind) -> ElementId {
        let id = self.ids.allocate();
        let name = format!("{}{}", kind.class_name(), id);
        let element = Element {
            id,
            properties: Properties::defaults_for(kind, &name),
            parent: None,
            children: SmallVec::new(),
        };
        log::info!("added {kind} {id:?}");
        self.elements.insert(id, element);
        self.roots.push(id);
        id
    }

    /// Put a detached subtree back as the last root.
    pub fn insert_at_root(&mut self, subtree: Subtree) -> Result<(), TreeError> {
        if let Some(taken) = subtree.ids().find(|id| self.elements.contains_key(id)) {
            return Err(TreeError::DuplicateId(taken));
        }

        let root = subtree.root;
        for mut element in subtree.elements {
            if element.id == root {
                element.parent = None;
            }
            self.ids.reserve(element.id);
            self.elements.insert(element.id, element);
        }
        self.roots.push(root);
        Ok(())
    }

    pub fn find_by_id(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn find_by_id_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    /// Children of `id` in stacking order. Empty for unknown ids.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(&id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(&id).and_then(|e| e.parent)
    }

    /// First direct child of `id` whose kind is `kind`.
    pub fn first_child_of_kind(&self, id: ElementId, kind: ElementKind) -> Option<ElementId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.elements.get(c).is_some_and(|e| e.kind() == kind))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Depth-first pre-order walk of the whole forest as `(depth, id)`.
    pub fn preorder(&self) -> Vec<(usize, ElementId)> {
        let mut out = Vec::with_capacity(self.elements.len());
        for &root in &self.roots {
            self.walk(root, 0, &mut out);
        }
        out
    }

    fn walk(&self, id: ElementId, depth: usize, out: &mut Vec<(usize, ElementId)>) {
        out.push((depth, id));
        for &child in self.children(id) {
            self.walk(child, depth + 1, out);
        }
    }

    /// All descendants of `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        for &child in self.children(id) {
            self.walk(child, 0, &mut out);
        }
        out.into_iter().map(|(_, id)| id).collect()
    }

    /// Check if `ancestor` is a parent/grandparent/etc. of `descendant`.
    pub fn is_ancestor_of(&self, ancestor: ElementId, descendant: ElementId) -> bool {
        if ancestor == descendant {
            return false;
        }
        let mut current = self.parent_of(descendant);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(p);
        }
        false
    }

    /// Unlink `id` from the collection that holds it.
    fn detach(&mut self, id: ElementId) {
        match self.parent_of(id) {
            Some(parent) => {
                if let Some(p) = self.elements.get_mut(&parent) {
                    p.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    /// Detach `id` with its whole subtree, wherever it lives.
    pub fn remove(&mut self, id: ElementId) -> Option<Subtree> {
        if !self.contains(id) {
            log::debug!("remove: {id:?} not found");
            return None;
        }

        self.detach(id);
        let mut order = vec![id];
        order.extend(self.descendants(id));

        let elements: Vec<Element> = order
            .into_iter()
            .filter_map(|i| self.elements.remove(&i))
            .collect();

        Some(Subtree { root: id, elements })
    }

    /// Remove and discard `id` with its subtree. Returns how many elements
    /// were destroyed.
    pub fn delete(&mut self, id: ElementId) -> Option<usize> {
        let removed = self.remove(id)?;
        log::info!("deleted {id:?} ({} elements)", removed.len());
        Some(removed.len())
    }

    /// Move `child` to the end of `new_parent`'s children.
    ///
    /// Rejects self-parenting and moves under a descendant; a rejected call
    /// leaves the tree unchanged.
    pub fn reparent(&mut self, child: ElementId, new_parent: ElementId) -> Result<(), TreeError> {
        if !self.contains(child) {
            return Err(TreeError::NotFound(child));
        }
        if !self.contains(new_parent) {
            return Err(TreeError::NotFound(new_parent));
        }
        if child == new_parent {
            return Err(TreeError::SelfParent(child));
        }
        if self.is_ancestor_of(child, new_parent) {
            return Err(TreeError::Cycle { child, new_parent });
        }

        self.detach(child);
        if let Some(c) = self.elements.get_mut(&child) {
            c.parent = Some(new_parent);
        }
        if let Some(p) = self.elements.get_mut(&new_parent) {
            p.children.push(child);
        }
        log::debug!("reparented {child:?} under {new_parent:?}");
        Ok(())
    }
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frame_with_two_children() -> (SceneTree, ElementId, ElementId, ElementId) {
        let mut tree = SceneTree::new();
        let frame = tree.add(ElementKind::Frame);
        let label = tree.add(ElementKind::TextLabel);
        let corner = tree.add(ElementKind::UICorner);
        tree.reparent(label, frame).unwrap();
        tree.reparent(corner, frame).unwrap();
        (tree, frame, label, corner)
    }

    #[test]
    fn add_names_by_kind_and_id() {
        let mut tree = SceneTree::new();
        let a = tree.add(ElementKind::Frame);
        let b = tree.add(ElementKind::TextButton);
        assert_eq!(a, ElementId::new(1));
        assert_eq!(b, ElementId::new(2));
        assert_eq!(tree.find_by_id(a).unwrap().name(), "Frame1");
        assert_eq!(tree.find_by_id(b).unwrap().name(), "TextButton2");
        assert_eq!(tree.roots(), &[a, b]);
    }

    #[test]
    fn remove_detaches_whole_subtree() {
        let (mut tree, frame, label, corner) = frame_with_two_children();
        let other = tree.add(ElementKind::Frame);

        let sub = tree.remove(frame).unwrap();
        assert_eq!(sub.root(), frame);
        assert_eq!(sub.len(), 3);
        assert_eq!(sub.ids().collect::<Vec<_>>(), vec![frame, label, corner]);
        assert_eq!(sub.get(label).map(|e| e.parent), Some(Some(frame)));
        assert_eq!(sub.get(corner).map(Element::name), Some("UICorner"));
        assert!(sub.get(other).is_none());
        assert!(tree.find_by_id(frame).is_none());
        assert!(tree.find_by_id(label).is_none());
        assert!(tree.find_by_id(corner).is_none());
        assert_eq!(tree.roots(), &[other]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn remove_nested_element_unlinks_from_parent() {
        let (mut tree, frame, label, corner) = frame_with_two_children();
        tree.remove(label).unwrap();
        assert_eq!(tree.children(frame), &[corner]);
        assert!(tree.remove(label).is_none());
    }

    #[test]
    fn reinsert_preserves_ids_and_properties() {
        let (mut tree, frame, label, _) = frame_with_two_children();
        tree.find_by_id_mut(label).unwrap().properties.common.name = "Title".into();
        let before = tree.find_by_id(label).unwrap().properties.clone();

        let sub = tree.remove(frame).unwrap();
        tree.insert_at_root(sub).unwrap();

        assert_eq!(tree.roots(), &[frame]);
        assert_eq!(tree.parent_of(label), Some(frame));
        assert_eq!(tree.find_by_id(label).unwrap().properties, before);

        // New ids continue past the reinserted ones
        let next = tree.add(ElementKind::Frame);
        assert_eq!(next, ElementId::new(4));
    }

    #[test]
    fn insert_rejects_live_ids() {
        let mut tree = SceneTree::new();
        let a = tree.add(ElementKind::Frame);
        let sub = tree.clone().remove(a).unwrap();
        assert_eq!(tree.insert_at_root(sub), Err(TreeError::DuplicateId(a)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn delete_counts_destroyed_elements() {
        let (mut tree, frame, _, _) = frame_with_two_children();
        assert_eq!(tree.delete(frame), Some(3));
        assert!(tree.is_empty());
        assert_eq!(tree.delete(frame), None);
    }

    #[test]
    fn reparent_rejects_self_and_cycles() {
        let (mut tree, frame, label, _) = frame_with_two_children();
        let before = tree.preorder();

        assert_eq!(tree.reparent(frame, frame), Err(TreeError::SelfParent(frame)));
        assert_eq!(
            tree.reparent(frame, label),
            Err(TreeError::Cycle {
                child: frame,
                new_parent: label
            })
        );
        assert_eq!(
            tree.reparent(frame, ElementId::new(99)),
            Err(TreeError::NotFound(ElementId::new(99)))
        );
        assert_eq!(tree.preorder(), before);
    }

    #[test]
    fn reparent_onto_grandchild_is_a_cycle() {
        let (mut tree, frame, label, _) = frame_with_two_children();
        let inner = tree.add(ElementKind::Frame);
        tree.reparent(inner, label).unwrap();
        assert!(tree.is_ancestor_of(frame, inner));
        assert!(matches!(tree.reparent(frame, inner), Err(TreeError::Cycle { .. })));
        assert_eq!(tree.parent_of(inner), Some(label));
    }

    #[test]
    fn reparent_moves_between_parents() {
        let (mut tree, frame, label, corner) = frame_with_two_children();
        let other = tree.add(ElementKind::Frame);
        tree.reparent(label, other).unwrap();

        assert_eq!(tree.children(frame), &[corner]);
        assert_eq!(tree.children(other), &[label]);
        assert_eq!(tree.parent_of(label), Some(other));

        // Root elements leave the root list when parented
        tree.reparent(other, frame).unwrap();
        assert_eq!(tree.roots(), &[frame]);
        assert_eq!(
            tree.preorder(),
            vec![(0, frame), (1, corner), (1, other), (2, label)]
        );
    }

    #[test]
    fn first_child_of_kind_finds_decorator() {
        let (tree, frame, _, corner) = frame_with_two_children();
        assert_eq!(tree.first_child_of_kind(frame, ElementKind::UICorner), Some(corner));
        assert_eq!(tree.first_child_of_kind(frame, ElementKind::UIGradient), None);
    }
}
