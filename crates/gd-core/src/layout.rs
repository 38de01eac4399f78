//! Layout resolver: scale + offset properties → absolute pixel boxes.
//!
//! Each element's `Size` and `Position` resolve against its container's
//! box (the viewport for roots), then `AnchorPoint` shifts the box so the
//! pivot lands on the position. A `UIListLayout` child takes over the
//! positions of its non-decorator siblings and stacks them instead.
//! Decorators resolve to their host's box.

use crate::id::ElementId;
use crate::model::*;
use crate::tree::SceneTree;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The canvas (viewport) dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Absolute, axis-aligned box of one element (before rotation).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Radius of the first corner decorator, already capped at half the
    /// shorter side. Zero when there is none.
    pub corner_radius: f32,
    /// Own visibility combined with every ancestor's.
    pub visible: bool,
}

impl ResolvedBox {
    fn viewport(v: Viewport) -> Self {
        Self {
            width: v.width,
            height: v.height,
            visible: true,
            ..Self::default()
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Largest radius a box of `width` × `height` can show.
pub fn max_corner_radius(width: f32, height: f32) -> f32 {
    (width.min(height) / 2.0).max(0.0)
}

/// Resolve every element of the tree.
///
/// Returns a map from [`ElementId`] → [`ResolvedBox`] with absolute
/// positions. Every live element gets an entry.
pub fn resolve_layout(tree: &SceneTree, viewport: Viewport) -> HashMap<ElementId, ResolvedBox> {
    let mut boxes = HashMap::with_capacity(tree.len());
    let container = ResolvedBox::viewport(viewport);
    resolve_siblings(tree, tree.roots(), container, None, &mut boxes);
    boxes
}

fn resolve_siblings(
    tree: &SceneTree,
    siblings: &[ElementId],
    container: ResolvedBox,
    host: Option<ElementId>,
    boxes: &mut HashMap<ElementId, ResolvedBox>,
) {
    let list = host.and_then(|h| tree.first_child_of_kind(h, ElementKind::UIListLayout));
    // Decorators cover the host's own box, not its scrolling canvas
    let host_box = host.and_then(|h| boxes.get(&h).copied()).unwrap_or(container);

    for &id in siblings {
        let Some(el) = tree.find_by_id(id) else {
            continue;
        };
        let bx = if el.kind().is_decorator() {
            ResolvedBox {
                corner_radius: 0.0,
                visible: host_box.visible && el.properties.common.visible,
                ..host_box
            }
        } else {
            own_box(&el.properties.common, container)
        };
        boxes.insert(id, bx);
    }

    if let Some(list_id) = list
        && let Some(KindProps::UIListLayout(layout)) =
            tree.find_by_id(list_id).map(|e| &e.properties.kind)
    {
        stack_siblings(tree, siblings, container, layout, boxes);
    }

    for &id in siblings {
        let Some(el) = tree.find_by_id(id) else {
            continue;
        };
        if el.kind().is_decorator() {
            continue;
        }
        let Some(mut bx) = boxes.get(&id).copied() else {
            continue;
        };

        if let Some(corner) = tree.first_child_of_kind(id, ElementKind::UICorner)
            && let Some(radius) = tree.find_by_id(corner).and_then(|c| c.properties.corner_radius())
        {
            let r = radius.resolve(bx.width.min(bx.height));
            bx.corner_radius = r.clamp(0.0, max_corner_radius(bx.width, bx.height));
            boxes.insert(id, bx);
        }

        let content = content_box(&el.properties, bx);
        resolve_siblings(tree, tree.children(id), content, Some(id), boxes);
    }
}

fn own_box(common: &CommonProps, container: ResolvedBox) -> ResolvedBox {
    let width = common.size.x.resolve(container.width).max(0.0);
    let height = common.size.y.resolve(container.height).max(0.0);
    let x = container.x + common.position.x.resolve(container.width) - common.anchor_point.x * width;
    let y = container.y + common.position.y.resolve(container.height) - common.anchor_point.y * height;
    ResolvedBox {
        x,
        y,
        width,
        height,
        corner_radius: 0.0,
        visible: container.visible && common.visible,
    }
}

/// Box children resolve against. Scrolling frames expose their canvas,
/// never smaller than the frame itself.
fn content_box(props: &Properties, bx: ResolvedBox) -> ResolvedBox {
    match &props.kind {
        KindProps::ScrollingFrame(scroll) => ResolvedBox {
            width: scroll.canvas_size.x.resolve(bx.width).max(bx.width),
            height: scroll.canvas_size.y.resolve(bx.height).max(bx.height),
            corner_radius: 0.0,
            ..bx
        },
        _ => ResolvedBox {
            corner_radius: 0.0,
            ..bx
        },
    }
}

fn stack_siblings(
    tree: &SceneTree,
    siblings: &[ElementId],
    container: ResolvedBox,
    layout: &ListLayoutProps,
    boxes: &mut HashMap<ElementId, ResolvedBox>,
) {
    let mut items: Vec<ElementId> = siblings
        .iter()
        .copied()
        .filter(|id| tree.find_by_id(*id).is_some_and(|e| !e.kind().is_decorator()))
        .collect();

    if layout.sort_order == SortOrder::Name {
        items.sort_by(|a, b| {
            let name = |id: &ElementId| tree.find_by_id(*id).map(|e| e.name().to_string());
            name(a).cmp(&name(b))
        });
    }

    let vertical = layout.fill_direction == FillDirection::Vertical;
    let gap = if vertical {
        layout.padding.resolve(container.height)
    } else {
        layout.padding.resolve(container.width)
    };

    let mut cursor = 0.0;
    for id in items {
        let Some(bx) = boxes.get_mut(&id) else {
            continue;
        };
        if vertical {
            bx.y = container.y + cursor;
            bx.x = container.x
                + match layout.horizontal_alignment {
                    HorizontalAlignment::Left => 0.0,
                    HorizontalAlignment::Center => (container.width - bx.width) / 2.0,
                    HorizontalAlignment::Right => container.width - bx.width,
                };
            cursor += bx.height + gap;
        } else {
            bx.x = container.x + cursor;
            bx.y = container.y
                + match layout.vertical_alignment {
                    VerticalAlignment::Top => 0.0,
                    VerticalAlignment::Center => (container.height - bx.height) / 2.0,
                    VerticalAlignment::Bottom => container.height - bx.height,
                };
            cursor += bx.width + gap;
        }
    }
}
