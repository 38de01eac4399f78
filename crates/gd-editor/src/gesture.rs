//! Pointer gestures: move, resize, corner radius and rotate.
//!
//! A gesture snapshots the target's properties when it starts. Every
//! pointer move recomputes the new geometry from that snapshot plus the
//! total pointer delta, never from the live values, so repeated moves to
//! the same point always land on the same result.

use crate::config::EditorConfig;
use crate::input::HandleDirection;
use gd_core::{ElementId, Properties, UDim2};

/// Which resize affordance started a resize gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    Directional(HandleDirection),
    Combined,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureMode {
    Moving,
    Resizing(ResizeHandle),
    AdjustingRadius,
    /// `center` is the element's resolved center in canvas space.
    Rotating { center: (f32, f32) },
}

/// An in-progress gesture and its snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveGesture {
    pub target: ElementId,
    pub mode: GestureMode,
    start: (f32, f32),
    original: Properties,
    /// Resolved box size when the gesture started. For corner decorators
    /// this is the host's box.
    box_size: (f32, f32),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Active(ActiveGesture),
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn active(&self) -> Option<&ActiveGesture> {
        match self {
            Self::Active(g) => Some(g),
            Self::Idle => None,
        }
    }
}

impl ActiveGesture {
    pub fn new(
        target: ElementId,
        mode: GestureMode,
        start: (f32, f32),
        original: Properties,
        box_size: (f32, f32),
    ) -> Self {
        Self {
            target,
            mode,
            start,
            original,
            box_size,
        }
    }

    /// Write the geometry for pointer position `(x, y)` into `props`.
    ///
    /// Only the fields the gesture drives are touched.
    pub fn apply(&self, props: &mut Properties, x: f32, y: f32, config: &EditorConfig) {
        let dx = x - self.start.0;
        let dy = y - self.start.1;
        let orig = &self.original.common;

        match self.mode {
            GestureMode::Moving => {
                props.common.position = move_by(orig.position, dx, dy);
            }
            GestureMode::Resizing(ResizeHandle::Directional(dir)) => {
                let (position, size) = resize_directional(orig.position, orig.size, dir, dx, dy, config.min_size);
                props.common.position = position;
                props.common.size = size;
            }
            GestureMode::Resizing(ResizeHandle::Combined) => {
                props.common.size = resize_combined(orig.size, dx, dy, config.min_size, config.dead_zone);
            }
            GestureMode::AdjustingRadius => {
                let (Some(orig_radius), Some(radius)) =
                    (self.original.corner_radius(), props.corner_radius_mut())
                else {
                    return;
                };
                radius.offset = adjust_radius(orig_radius.offset, self.box_size, dx, dy);
            }
            GestureMode::Rotating { center } => {
                props.common.rotation = rotate(orig.rotation, center, self.start, (x, y));
            }
        }
        log::trace!("{:?} {:?} by ({dx}, {dy})", self.target, self.mode);
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

pub fn move_by(position: UDim2, dx: f32, dy: f32) -> UDim2 {
    let mut p = position;
    p.x.offset += dx;
    p.y.offset += dy;
    p
}

/// Edge or corner resize. West and north edges also shift the position by
/// however much the size actually changed, so the opposite edge stays put
/// even when the size hits the floor.
pub fn resize_directional(
    position: UDim2,
    size: UDim2,
    dir: HandleDirection,
    dx: f32,
    dy: f32,
    min_size: f32,
) -> (UDim2, UDim2) {
    let (mut p, mut s) = (position, size);
    let (w, h) = (size.x.offset, size.y.offset);

    if dir.moves_east() {
        s.x.offset = (w + dx).max(min_size);
    }
    if dir.moves_west() {
        s.x.offset = (w - dx).max(min_size);
        p.x.offset = position.x.offset + (w - s.x.offset);
    }
    if dir.moves_south() {
        s.y.offset = (h + dy).max(min_size);
    }
    if dir.moves_north() {
        s.y.offset = (h - dy).max(min_size);
        p.y.offset = position.y.offset + (h - s.y.offset);
    }
    (p, s)
}

/// Single-handle resize. A clearly diagonal drag scales both axes along
/// the original aspect ratio; otherwise only the dominant axis changes.
pub fn resize_combined(size: UDim2, dx: f32, dy: f32, min_size: f32, dead_zone: f32) -> UDim2 {
    let mut s = size;
    let (w, h) = (size.x.offset, size.y.offset);

    if dx.abs() > dead_zone && dy.abs() > dead_zone {
        let aspect = if h > 0.0 { w / h } else { 1.0 };
        let d = dx.signum() * dx.hypot(dy);
        s.x.offset = (w + d * aspect).max(min_size);
        s.y.offset = (h + d).max(min_size);
    } else if dx.abs() > dy.abs() {
        s.x.offset = (w + dx).max(min_size);
    } else {
        s.y.offset = (h + dy).max(min_size);
    }
    s
}

/// New radius offset, kept within `0 ..= min(w, h) / 2`.
pub fn adjust_radius(original: f32, box_size: (f32, f32), dx: f32, dy: f32) -> f32 {
    let cap = gd_core::layout::max_corner_radius(box_size.0, box_size.1);
    (original + (dx + dy) / 2.0).max(0.0).min(cap)
}

/// Rotation after dragging the rotate handle from `start` to `pointer`
/// around `center`, normalized to (-180, 180].
pub fn rotate(original: f32, center: (f32, f32), start: (f32, f32), pointer: (f32, f32)) -> f32 {
    let angle = |p: (f32, f32)| (p.1 - center.1).atan2(p.0 - center.0);
    let delta = (angle(pointer) - angle(start)).to_degrees();
    normalize_degrees(original + delta)
}

pub fn normalize_degrees(deg: f32) -> f32 {
    let r = deg.rem_euclid(360.0);
    if r > 180.0 { r - 360.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(w: f32, h: f32) -> UDim2 {
        UDim2::from_offset(w, h)
    }

    #[test]
    fn west_drag_grows_and_shifts() {
        let (p, s) = resize_directional(size(50.0, 50.0), size(200.0, 100.0), HandleDirection::W, -50.0, 0.0, 20.0);
        assert_eq!(s.x.offset, 250.0);
        assert_eq!(s.y.offset, 100.0);
        assert_eq!(p.x.offset, 0.0);
        assert_eq!(p.y.offset, 50.0);
    }

    #[test]
    fn west_drag_clamps_without_moving_east_edge() {
        let (p, s) = resize_directional(size(50.0, 50.0), size(200.0, 100.0), HandleDirection::W, 300.0, 0.0, 20.0);
        assert_eq!(s.x.offset, 20.0);
        // east edge stays at 250
        assert_eq!(p.x.offset + s.x.offset, 250.0);
    }

    #[test]
    fn corner_handle_combines_edges() {
        let (p, s) = resize_directional(size(0.0, 0.0), size(100.0, 100.0), HandleDirection::NE, 30.0, 40.0, 20.0);
        assert_eq!(s.x.offset, 130.0);
        assert_eq!(s.y.offset, 60.0);
        assert_eq!(p.x.offset, 0.0);
        assert_eq!(p.y.offset, 40.0);
    }

    #[test]
    fn resize_never_goes_below_floor() {
        for dir in HandleDirection::ALL {
            for (dx, dy) in [(-500.0, -500.0), (500.0, 500.0), (-500.0, 500.0), (500.0, -500.0)] {
                let (_, s) = resize_directional(size(0.0, 0.0), size(50.0, 50.0), dir, dx, dy, 20.0);
                assert!(s.x.offset >= 20.0 && s.y.offset >= 20.0, "{dir:?} ({dx}, {dy}) -> {s:?}");
            }
        }
        let s = resize_combined(size(50.0, 50.0), -400.0, -300.0, 20.0, 10.0);
        assert_eq!((s.x.offset, s.y.offset), (20.0, 20.0));
    }

    #[test]
    fn combined_diagonal_keeps_aspect() {
        // 3-4-5 triangle: d = 5
        let s = resize_combined(size(200.0, 100.0), 30.0, 40.0, 20.0, 10.0);
        assert!((s.x.offset - 300.0).abs() < 0.01, "w {}", s.x.offset);
        assert!((s.y.offset - 150.0).abs() < 0.01, "h {}", s.y.offset);

        // Leftward diagonal shrinks
        let s = resize_combined(size(200.0, 100.0), -30.0, 40.0, 20.0, 10.0);
        assert!((s.y.offset - 50.0).abs() < 0.01, "h {}", s.y.offset);
    }

    #[test]
    fn combined_inside_dead_zone_uses_dominant_axis() {
        let s = resize_combined(size(200.0, 100.0), 40.0, 5.0, 20.0, 10.0);
        assert_eq!((s.x.offset, s.y.offset), (240.0, 100.0));

        let s = resize_combined(size(200.0, 100.0), 3.0, -8.0, 20.0, 10.0);
        assert_eq!((s.x.offset, s.y.offset), (200.0, 92.0));
    }

    #[test]
    fn radius_clamps_to_half_short_side() {
        assert_eq!(adjust_radius(0.0, (40.0, 40.0), 60.0, 40.0), 20.0);
        assert_eq!(adjust_radius(8.0, (200.0, 100.0), -40.0, -40.0), 0.0);
        assert_eq!(adjust_radius(8.0, (200.0, 100.0), 4.0, 2.0), 11.0);
    }

    #[test]
    fn rotation_follows_pointer_angle() {
        let center = (100.0, 100.0);
        // From the right of center to below it: +90° clockwise on screen
        let r = rotate(0.0, center, (200.0, 100.0), (100.0, 200.0));
        assert!((r - 90.0).abs() < 0.01, "rotation {r}");

        let r = rotate(170.0, center, (200.0, 100.0), (100.0, 200.0));
        assert!((r - -100.0).abs() < 0.01, "rotation {r}");
    }

    #[test]
    fn normalize_degrees_range() {
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(270.0), -90.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
    }
}
