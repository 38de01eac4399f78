//! Scene tree → render-ready tree.
//!
//! Resolves layout, folds decorators into their hosts (corner radius,
//! gradient fill), drops invisible subtrees, orders siblings for painting
//! and composes rotations into one affine per node. Hosts draw the result
//! however they like; this crate never touches pixels.

use gd_core::model::*;
use gd_core::{ElementId, ResolvedBox, SceneTree, Viewport, resolve_layout};
use kurbo::{Affine, Point, Rect};
use serde::Serialize;
use std::collections::HashMap;

/// Text to draw inside a node's box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRender {
    pub text: String,
    /// Shown instead of `text` when it is empty (text boxes).
    pub placeholder: Option<String>,
    pub color: Color3,
    pub size: f32,
    pub font: Font,
    pub wrapped: bool,
    pub x_alignment: TextXAlignment,
    pub y_alignment: TextYAlignment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRender {
    pub image: String,
    pub color: Color3,
    pub transparency: f32,
    pub scale_type: ScaleType,
}

/// Background gradient taken from a `UIGradient` child.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientRender {
    /// Sorted by time.
    pub stops: Vec<GradientStop>,
    /// Degrees.
    pub rotation: f32,
}

/// One drawable element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub id: ElementId,
    pub kind: ElementKind,
    pub name: String,
    /// Unrotated box in canvas pixels.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Own rotation in degrees, about `pivot`.
    pub rotation: f32,
    pub pivot: (f32, f32),
    /// Box space → canvas space, including every ancestor's rotation.
    /// Coefficients as in [`Affine::as_coeffs`].
    pub transform: [f64; 6],
    pub corner_radius: f32,
    pub background: Color3,
    pub background_transparency: f32,
    pub gradient: Option<GradientRender>,
    pub z_index: i32,
    pub text: Option<TextRender>,
    pub image: Option<ImageRender>,
    /// Children are clipped to this node's box.
    pub clips_descendants: bool,
    /// Paint order: back to front.
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x as f64,
            self.y as f64,
            (self.x + self.width) as f64,
            (self.y + self.height) as f64,
        )
    }

    pub fn affine(&self) -> Affine {
        Affine::new(self.transform)
    }

    /// Whether canvas point `(px, py)` lands inside the rotated box.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        let local = self.affine().inverse() * Point::new(px as f64, py as f64);
        self.rect().contains(local)
    }
}

/// Where an element sits on the canvas, kept for every live element
/// including decorators (which share their host's box).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub bounds: ResolvedBox,
    pub transform: Affine,
    /// Resolved corner radius when the element is, or hosts, a `UICorner`.
    pub corner: Option<f32>,
}

impl Placement {
    pub fn center(&self) -> (f32, f32) {
        let c = self.transform * Point::new(
            (self.bounds.x + self.bounds.width / 2.0) as f64,
            (self.bounds.y + self.bounds.height / 2.0) as f64,
        );
        (c.x as f32, c.y as f32)
    }
}

/// Render-ready view of a scene tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderTree {
    /// Paint order: back to front.
    pub roots: Vec<RenderNode>,
    #[serde(skip)]
    placements: HashMap<ElementId, Placement>,
}

impl RenderTree {
    pub fn placement(&self, id: ElementId) -> Option<&Placement> {
        self.placements.get(&id)
    }

    /// Depth-first lookup of a drawn node.
    pub fn find(&self, id: ElementId) -> Option<&RenderNode> {
        fn walk(nodes: &[RenderNode], id: ElementId) -> Option<&RenderNode> {
            nodes
                .iter()
                .find_map(|n| if n.id == id { Some(n) } else { walk(&n.children, id) })
        }
        walk(&self.roots, id)
    }
}

/// Build the render tree for `tree` laid out in `viewport`.
pub fn build_render_tree(tree: &SceneTree, viewport: Viewport) -> RenderTree {
    let boxes = resolve_layout(tree, viewport);
    let mut placements = HashMap::with_capacity(tree.len());
    let roots = build_siblings(tree, tree.roots(), &boxes, Affine::IDENTITY, &mut placements);
    log::trace!("render tree: {} roots, {} placements", roots.len(), placements.len());
    RenderTree { roots, placements }
}

fn build_siblings(
    tree: &SceneTree,
    siblings: &[ElementId],
    boxes: &HashMap<ElementId, ResolvedBox>,
    parent_transform: Affine,
    placements: &mut HashMap<ElementId, Placement>,
) -> Vec<RenderNode> {
    let mut nodes = Vec::new();

    for &id in siblings {
        let (Some(el), Some(&bx)) = (tree.find_by_id(id), boxes.get(&id)) else {
            continue;
        };
        let kind = el.kind();

        if kind.is_decorator() {
            // Decorators share the host's placement; a hostless one draws
            // nothing and gets none
            let Some(host) = el.parent.and_then(|p| placements.get(&p)).copied() else {
                continue;
            };
            let corner = match kind {
                ElementKind::UICorner => Some(host.corner.unwrap_or(0.0)),
                _ => None,
            };
            placements.insert(
                id,
                Placement {
                    bounds: bx,
                    transform: host.transform,
                    corner,
                },
            );
            continue;
        }

        let common = &el.properties.common;
        let pivot = bx.center();
        let transform = parent_transform
            * Affine::rotate_about(
                (common.rotation as f64).to_radians(),
                Point::new(pivot.0 as f64, pivot.1 as f64),
            );
        let has_corner = tree.first_child_of_kind(id, ElementKind::UICorner).is_some();
        placements.insert(
            id,
            Placement {
                bounds: bx,
                transform,
                corner: has_corner.then_some(bx.corner_radius),
            },
        );

        let children = build_siblings(tree, tree.children(id), boxes, transform, placements);
        if !bx.visible {
            continue;
        }

        nodes.push(RenderNode {
            id,
            kind,
            name: common.name.clone(),
            x: bx.x,
            y: bx.y,
            width: bx.width,
            height: bx.height,
            rotation: common.rotation,
            pivot,
            transform: transform.as_coeffs(),
            corner_radius: bx.corner_radius,
            background: common.background_color,
            background_transparency: common.background_transparency,
            gradient: gradient_of(tree, id),
            z_index: common.z_index,
            text: text_of(&el.properties),
            image: image_of(&el.properties),
            clips_descendants: kind == ElementKind::ScrollingFrame,
            children,
        });
    }

    // Stable: equal ZIndex keeps child order
    nodes.sort_by_key(|n| n.z_index);
    nodes
}

fn gradient_of(tree: &SceneTree, host: ElementId) -> Option<GradientRender> {
    let id = tree.first_child_of_kind(host, ElementKind::UIGradient)?;
    let el = tree.find_by_id(id)?;
    let KindProps::UIGradient { color } = &el.properties.kind else {
        return None;
    };
    let mut stops = color.clone();
    stops.sort_by(|a, b| a.time.total_cmp(&b.time));
    Some(GradientRender {
        stops,
        rotation: el.properties.common.rotation,
    })
}

fn text_of(props: &Properties) -> Option<TextRender> {
    let t = props.text()?;
    let placeholder = match &props.kind {
        KindProps::TextBox(b) => Some(b.placeholder_text.clone()),
        _ => None,
    };
    Some(TextRender {
        text: t.text.clone(),
        placeholder,
        color: t.text_color,
        size: t.text_size,
        font: t.font,
        wrapped: t.text_wrapped,
        x_alignment: t.text_x_alignment,
        y_alignment: t.text_y_alignment,
    })
}

fn image_of(props: &Properties) -> Option<ImageRender> {
    let KindProps::ImageLabel(img) = &props.kind else {
        return None;
    };
    Some(ImageRender {
        image: img.image.clone(),
        color: img.image_color,
        transparency: img.image_transparency,
        scale_type: img.scale_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gd_core::FieldKey;
    use pretty_assertions::assert_eq;

    fn set(tree: &mut SceneTree, id: ElementId, path: &str, raw: &str) {
        let key = FieldKey::parse(path).unwrap();
        tree.find_by_id_mut(id).unwrap().properties.set(key, raw).unwrap();
    }

    #[test]
    fn decorators_fold_into_host() {
        let mut tree = SceneTree::new();
        let host = tree.add(ElementKind::Frame);
        let corner = tree.add(ElementKind::UICorner);
        let gradient = tree.add(ElementKind::UIGradient);
        tree.reparent(corner, host).unwrap();
        tree.reparent(gradient, host).unwrap();

        let rt = build_render_tree(&tree, Viewport::default());
        assert_eq!(rt.roots.len(), 1);
        let node = &rt.roots[0];
        assert!(node.children.is_empty());
        assert!((node.corner_radius - 8.0).abs() < 0.01);
        let g = node.gradient.as_ref().unwrap();
        assert_eq!(g.stops.len(), 2);
        assert_eq!(g.rotation, 90.0);

        // The decorator still has a placement for overlays
        assert_eq!(rt.placement(corner).unwrap().corner, Some(8.0));
        assert!(rt.find(corner).is_none());
    }

    #[test]
    fn hostless_decorator_has_no_placement() {
        let mut tree = SceneTree::new();
        let corner = tree.add(ElementKind::UICorner);
        let gradient = tree.add(ElementKind::UIGradient);

        let rt = build_render_tree(&tree, Viewport::default());
        assert!(rt.roots.is_empty());
        assert!(rt.placement(corner).is_none());
        assert!(rt.placement(gradient).is_none());
    }

    #[test]
    fn invisible_subtrees_are_dropped() {
        let mut tree = SceneTree::new();
        let a = tree.add(ElementKind::Frame);
        let b = tree.add(ElementKind::TextLabel);
        tree.reparent(b, a).unwrap();
        set(&mut tree, a, "Visible", "false");

        let rt = build_render_tree(&tree, Viewport::default());
        assert!(rt.roots.is_empty());
        assert!(rt.placement(b).is_some());
    }

    #[test]
    fn siblings_paint_in_zindex_order() {
        let mut tree = SceneTree::new();
        let a = tree.add(ElementKind::Frame);
        let b = tree.add(ElementKind::Frame);
        let c = tree.add(ElementKind::Frame);
        set(&mut tree, a, "ZIndex", "5");

        let rt = build_render_tree(&tree, Viewport::default());
        let order: Vec<ElementId> = rt.roots.iter().map(|n| n.id).collect();
        assert_eq!(order, vec![b, c, a]);
    }

    #[test]
    fn rotation_composes_and_contains_respects_it() {
        let mut tree = SceneTree::new();
        let a = tree.add(ElementKind::Frame);
        set(&mut tree, a, "Rotation", "90");

        let rt = build_render_tree(&tree, Viewport::default());
        let node = &rt.roots[0];
        assert_eq!(node.pivot, (150.0, 100.0));
        // A 200×100 box turned 90° spans y 0..200 around its center
        assert!(node.contains(150.0, 10.0));
        assert!(!node.contains(60.0, 100.0));
    }

    #[test]
    fn text_box_carries_placeholder() {
        let mut tree = SceneTree::new();
        tree.add(ElementKind::TextBox);
        let rt = build_render_tree(&tree, Viewport::default());
        let text = rt.roots[0].text.as_ref().unwrap();
        assert_eq!(text.placeholder.as_deref(), Some("Type here..."));
        assert_eq!(text.color, Color3::BLACK);
    }
}
