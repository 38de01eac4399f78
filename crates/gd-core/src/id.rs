use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an element in the scene tree.
///
/// Assigned monotonically by [`SceneTree::add`](crate::tree::SceneTree::add),
/// starting at 1, and never reused within a tree. 4 bytes, `Copy`, O(1) hash.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u32);

impl ElementId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Monotonic id source owned by a single tree.
#[derive(Debug, Clone)]
pub(crate) struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub(crate) fn new() -> Self {
        Self { next: 1 }
    }

    pub(crate) fn allocate(&mut self) -> ElementId {
        let id = ElementId(self.next);
        self.next += 1;
        id
    }

    /// Ensure ids handed out later never collide with `id`.
    pub(crate) fn reserve(&mut self, id: ElementId) {
        if id.0 >= self.next {
            self.next = id.0 + 1;
        }
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ElementId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}
