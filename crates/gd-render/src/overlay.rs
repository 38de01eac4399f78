//! Selection overlay: the selected element's outline and its handles.
//!
//! Handle rectangles are expressed in the element's own (unrotated) box
//! space; `transform` maps them onto the canvas.

use crate::scene::RenderTree;
use gd_core::ElementId;
use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};

/// Side length of a resize or radius handle.
pub const HANDLE_SIZE: f32 = 10.0;
/// Side length of the single combined handle used on narrow screens.
pub const COMBINED_HANDLE_SIZE: f32 = 20.0;
/// Distance of the rotate handle above the top edge.
pub const ROTATE_HANDLE_OFFSET: f32 = 24.0;

/// Which resize affordance the overlay shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleMode {
    /// Eight edge/corner handles (wide screens).
    #[default]
    Directional,
    /// One bottom-right handle resizing both axes (narrow screens).
    Combined,
}

/// Compass direction of a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl HandleDirection {
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    pub fn moves_north(&self) -> bool {
        matches!(self, Self::N | Self::NE | Self::NW)
    }

    pub fn moves_south(&self) -> bool {
        matches!(self, Self::S | Self::SE | Self::SW)
    }

    pub fn moves_east(&self) -> bool {
        matches!(self, Self::E | Self::NE | Self::SE)
    }

    pub fn moves_west(&self) -> bool {
        matches!(self, Self::W | Self::NW | Self::SW)
    }

    /// Handle center on a `w` × `h` box with its origin at (0, 0).
    fn anchor(&self, w: f32, h: f32) -> (f32, f32) {
        let x = if self.moves_west() {
            0.0
        } else if self.moves_east() {
            w
        } else {
            w / 2.0
        };
        let y = if self.moves_north() {
            0.0
        } else if self.moves_south() {
            h
        } else {
            h / 2.0
        };
        (x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "direction", rename_all = "lowercase")]
pub enum HandleKind {
    Resize(HandleDirection),
    Combined,
    Radius,
    Rotate,
}

/// A square hot spot of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Handle {
    pub kind: HandleKind,
    /// Center in canvas space before rotation.
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl Handle {
    fn centered(kind: HandleKind, x: f32, y: f32, size: f32) -> Self {
        Self { kind, x, y, size }
    }

    pub fn rect(&self) -> Rect {
        let half = (self.size / 2.0) as f64;
        let (x, y) = (self.x as f64, self.y as f64);
        Rect::new(x - half, y - half, x + half, y + half)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionOverlay {
    pub id: ElementId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub transform: [f64; 6],
    /// Topmost first.
    pub handles: Vec<Handle>,
}

impl SelectionOverlay {
    /// The handle under canvas point `(px, py)`, if any.
    pub fn handle_at(&self, px: f32, py: f32) -> Option<HandleKind> {
        let local = Affine::new(self.transform).inverse() * Point::new(px as f64, py as f64);
        self.handles
            .iter()
            .find(|h| h.rect().contains(local))
            .map(|h| h.kind)
    }
}

/// Outline and handles for `selected`, or `None` when it has no placement.
///
/// The radius handle only appears when the selection is, or hosts, a
/// corner decorator. It sits inside the top-left corner, inset by the
/// current radius.
pub fn selection_overlay(
    render: &RenderTree,
    selected: ElementId,
    mode: HandleMode,
) -> Option<SelectionOverlay> {
    let placement = render.placement(selected)?;
    let b = placement.bounds;
    let mut handles = Vec::with_capacity(11);

    handles.push(Handle::centered(
        HandleKind::Rotate,
        b.x + b.width / 2.0,
        b.y - ROTATE_HANDLE_OFFSET,
        HANDLE_SIZE,
    ));

    match mode {
        HandleMode::Directional => {
            for dir in HandleDirection::ALL {
                let (dx, dy) = dir.anchor(b.width, b.height);
                handles.push(Handle::centered(
                    HandleKind::Resize(dir),
                    b.x + dx,
                    b.y + dy,
                    HANDLE_SIZE,
                ));
            }
        }
        HandleMode::Combined => handles.push(Handle::centered(
            HandleKind::Combined,
            b.x + b.width,
            b.y + b.height,
            COMBINED_HANDLE_SIZE,
        )),
    }

    if let Some(radius) = placement.corner {
        let inset = radius + HANDLE_SIZE;
        handles.push(Handle::centered(
            HandleKind::Radius,
            b.x + inset,
            b.y + inset,
            HANDLE_SIZE,
        ));
    }

    Some(SelectionOverlay {
        id: selected,
        x: b.x,
        y: b.y,
        width: b.width,
        height: b.height,
        transform: placement.transform.as_coeffs(),
        handles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::build_render_tree;
    use gd_core::{ElementKind, SceneTree, Viewport};

    #[test]
    fn directional_overlay_has_eight_resize_handles() {
        let mut tree = SceneTree::new();
        let a = tree.add(ElementKind::Frame);
        let rt = build_render_tree(&tree, Viewport::default());
        let ov = selection_overlay(&rt, a, HandleMode::Directional).unwrap();

        let resize = ov
            .handles
            .iter()
            .filter(|h| matches!(h.kind, HandleKind::Resize(_)))
            .count();
        assert_eq!(resize, 8);
        assert!(!ov.handles.iter().any(|h| h.kind == HandleKind::Radius));

        // Frame box is (50, 50) 200×100
        assert_eq!(ov.handle_at(250.0, 100.0), Some(HandleKind::Resize(HandleDirection::E)));
        assert_eq!(ov.handle_at(52.0, 148.0), Some(HandleKind::Resize(HandleDirection::SW)));
        assert_eq!(ov.handle_at(150.0, 26.0), Some(HandleKind::Rotate));
        assert_eq!(ov.handle_at(150.0, 100.0), None);
    }

    #[test]
    fn combined_mode_has_one_resize_handle() {
        let mut tree = SceneTree::new();
        let a = tree.add(ElementKind::Frame);
        let rt = build_render_tree(&tree, Viewport::default());
        let ov = selection_overlay(&rt, a, HandleMode::Combined).unwrap();

        assert_eq!(ov.handle_at(255.0, 155.0), Some(HandleKind::Combined));
        assert_eq!(ov.handle_at(250.0, 100.0), None);
    }

    #[test]
    fn radius_handle_follows_corner_decorator() {
        let mut tree = SceneTree::new();
        let host = tree.add(ElementKind::Frame);
        let corner = tree.add(ElementKind::UICorner);
        tree.reparent(corner, host).unwrap();
        let rt = build_render_tree(&tree, Viewport::default());

        for selected in [host, corner] {
            let ov = selection_overlay(&rt, selected, HandleMode::Directional).unwrap();
            // radius 8 + inset 10 from the (50, 50) corner
            assert_eq!(ov.handle_at(68.0, 68.0), Some(HandleKind::Radius));
        }
    }

    #[test]
    fn unknown_selection_has_no_overlay() {
        let rt = build_render_tree(&SceneTree::new(), Viewport::default());
        assert!(selection_overlay(&rt, ElementId::new(3), HandleMode::Directional).is_none());
    }

    #[test]
    fn hostless_decorator_has_no_overlay() {
        let mut tree = SceneTree::new();
        let corner = tree.add(ElementKind::UICorner);
        let rt = build_render_tree(&tree, Viewport::default());
        assert!(selection_overlay(&rt, corner, HandleMode::Directional).is_none());
        assert!(selection_overlay(&rt, corner, HandleMode::Combined).is_none());
    }
}
