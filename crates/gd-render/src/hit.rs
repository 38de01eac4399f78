//! Hit testing: point → element lookup and pointer target classification.
//!
//! Reverse-walks the render tree (front-to-back) to find which element
//! is at a given (x, y) canvas position.

use crate::overlay::{HandleDirection, HandleKind, SelectionOverlay};
use crate::scene::{RenderNode, RenderTree};
use gd_core::ElementId;
use serde::{Deserialize, Serialize};

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerTarget {
    Element { id: ElementId },
    ResizeHandle { direction: HandleDirection },
    CombinedHandle,
    RadiusHandle,
    RotateHandle,
    Background,
}

impl From<HandleKind> for PointerTarget {
    fn from(kind: HandleKind) -> Self {
        match kind {
            HandleKind::Resize(direction) => Self::ResizeHandle { direction },
            HandleKind::Combined => Self::CombinedHandle,
            HandleKind::Radius => Self::RadiusHandle,
            HandleKind::Rotate => Self::RotateHandle,
        }
    }
}

/// Find the topmost element at position (px, py).
/// Returns `None` if nothing is hit (background).
pub fn hit_test(render: &RenderTree, px: f32, py: f32) -> Option<ElementId> {
    hit_nodes(&render.roots, px, py)
}

fn hit_nodes(nodes: &[RenderNode], px: f32, py: f32) -> Option<ElementId> {
    // Last painted = topmost
    for node in nodes.iter().rev() {
        if let Some(hit) = hit_node(node, px, py) {
            return Some(hit);
        }
    }
    None
}

fn hit_node(node: &RenderNode, px: f32, py: f32) -> Option<ElementId> {
    let inside = node.contains(px, py);
    if node.clips_descendants && !inside {
        return None;
    }
    if let Some(hit) = hit_nodes(&node.children, px, py) {
        return Some(hit);
    }
    inside.then_some(node.id)
}

/// Classify a pointer-down: overlay handles win over elements, elements
/// over the background.
pub fn classify(
    render: &RenderTree,
    overlay: Option<&SelectionOverlay>,
    px: f32,
    py: f32,
) -> PointerTarget {
    if let Some(kind) = overlay.and_then(|o| o.handle_at(px, py)) {
        return kind.into();
    }
    match hit_test(render, px, py) {
        Some(id) => PointerTarget::Element { id },
        None => PointerTarget::Background,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{HandleMode, selection_overlay};
    use crate::scene::build_render_tree;
    use gd_core::{ElementKind, FieldKey, SceneTree, Viewport};

    fn set(tree: &mut SceneTree, id: ElementId, path: &str, raw: &str) {
        let key = FieldKey::parse(path).unwrap();
        tree.find_by_id_mut(id).unwrap().properties.set(key, raw).unwrap();
    }

    #[test]
    fn hit_test_basic() {
        let mut tree = SceneTree::new();
        let a = tree.add(ElementKind::Frame);
        let b = tree.add(ElementKind::Frame);
        set(&mut tree, b, "Position.Offset.X", "400");

        let rt = build_render_tree(&tree, Viewport::default());
        assert_eq!(hit_test(&rt, 60.0, 60.0), Some(a));
        assert_eq!(hit_test(&rt, 450.0, 60.0), Some(b));
        assert_eq!(hit_test(&rt, 799.0, 599.0), None);
    }

    #[test]
    fn topmost_sibling_and_children_win() {
        let mut tree = SceneTree::new();
        let back = tree.add(ElementKind::Frame);
        let front = tree.add(ElementKind::Frame);
        let rt = build_render_tree(&tree, Viewport::default());
        assert_eq!(hit_test(&rt, 100.0, 100.0), Some(front));

        let child = tree.add(ElementKind::TextLabel);
        tree.reparent(child, back).unwrap();
        set(&mut tree, back, "ZIndex", "2");
        let rt = build_render_tree(&tree, Viewport::default());
        // child sits at (100, 100) inside back, which now paints above front
        assert_eq!(hit_test(&rt, 110.0, 110.0), Some(child));
        assert_eq!(hit_test(&rt, 60.0, 60.0), Some(back));
    }

    #[test]
    fn scrolling_frame_clips_hits() {
        let mut tree = SceneTree::new();
        let scroll = tree.add(ElementKind::ScrollingFrame);
        let child = tree.add(ElementKind::Frame);
        tree.reparent(child, scroll).unwrap();

        let rt = build_render_tree(&tree, Viewport::default());
        // child spans (100, 100)..(300, 200), frame ends at (250, 150)
        assert_eq!(hit_test(&rt, 200.0, 120.0), Some(child));
        assert_eq!(hit_test(&rt, 280.0, 180.0), None);
    }

    #[test]
    fn classify_prefers_handles() {
        let mut tree = SceneTree::new();
        let a = tree.add(ElementKind::Frame);
        let rt = build_render_tree(&tree, Viewport::default());
        let ov = selection_overlay(&rt, a, HandleMode::Directional);

        assert_eq!(
            classify(&rt, ov.as_ref(), 250.0, 150.0),
            PointerTarget::ResizeHandle {
                direction: HandleDirection::SE
            }
        );
        assert_eq!(classify(&rt, ov.as_ref(), 150.0, 100.0), PointerTarget::Element { id: a });
        assert_eq!(classify(&rt, ov.as_ref(), 600.0, 400.0), PointerTarget::Background);
        assert_eq!(classify(&rt, None, 248.0, 148.0), PointerTarget::Element { id: a });
    }
}
