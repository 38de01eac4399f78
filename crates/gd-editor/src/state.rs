//! Editor state: the tree being edited plus everything the UI tracks
//! around it (selection, expanded explorer rows, the live gesture).
//!
//! Every host event goes through one method here and fully completes its
//! mutation before returning. Methods return whether anything changed so
//! the host knows when to re-derive the render tree, explorer rows and
//! property fields.

use crate::config::{EditorConfig, HandleMode};
use crate::explorer::{ExplorerRow, explorer_rows};
use crate::gesture::{ActiveGesture, GestureMode, GestureState, ResizeHandle};
use crate::input::{Command, PointerEvent, PointerKind, PointerTarget, PropertyEdit, TreeDrop};
use gd_core::fields::FieldGroup;
use gd_core::{ElementId, ElementKind, FieldKey, SceneTree, ValueType, Viewport, generate};
use gd_render::{RenderTree, SelectionOverlay, build_render_tree, classify, selection_overlay};
use serde::Serialize;
use std::collections::HashSet;

/// One row of the property panel for the selected element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyField {
    pub key: FieldKey,
    pub path: String,
    pub label: String,
    pub group: FieldGroup,
    pub value_type: ValueType,
    /// Raw text the input shows.
    pub value: String,
}

pub struct EditorState {
    /// The element forest (single source of truth).
    pub tree: SceneTree,
    selection: Option<ElementId>,
    expanded: HashSet<ElementId>,
    gesture: GestureState,
    viewport: Viewport,
    config: EditorConfig,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default(), Viewport::default())
    }
}

impl EditorState {
    pub fn new(config: EditorConfig, viewport: Viewport) -> Self {
        let mut state = Self {
            tree: SceneTree::new(),
            selection: None,
            expanded: HashSet::new(),
            gesture: GestureState::Idle,
            viewport,
            config,
        };
        if state.config.auto_handle_mode {
            state.config.handle_mode = state.config.handle_mode_for(viewport.width);
        }
        state
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.selection
    }

    pub fn is_expanded(&self, id: ElementId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn handle_mode(&self) -> HandleMode {
        self.config.handle_mode
    }

    /// Resize the canvas. With `auto_handle_mode` this also switches
    /// between directional and combined handles.
    pub fn set_viewport(&mut self, width: f32, height: f32) -> bool {
        let viewport = Viewport { width, height };
        let mode = if self.config.auto_handle_mode {
            self.config.handle_mode_for(width)
        } else {
            self.config.handle_mode
        };
        let changed = viewport != self.viewport || mode != self.config.handle_mode;
        self.viewport = viewport;
        self.config.handle_mode = mode;
        changed
    }

    // ─── Commands ────────────────────────────────────────────────────────

    pub fn command(&mut self, command: &Command) -> bool {
        match *command {
            Command::Add { kind } => {
                self.add(kind);
                true
            }
            Command::Delete { id } => self.delete(id),
            Command::Select { id } => self.select(id),
            Command::ToggleExpanded { id } => self.toggle_expanded(id),
        }
    }

    /// Create a root element of `kind` and select it.
    pub fn add(&mut self, kind: ElementKind) -> ElementId {
        let id = self.tree.add(kind);
        self.selection = Some(id);
        id
    }

    /// Delete `id` and its subtree. Clears the selection when it was inside
    /// the deleted subtree.
    pub fn delete(&mut self, id: ElementId) -> bool {
        if !self.tree.contains(id) {
            log::debug!("delete: {id:?} not found");
            return false;
        }

        let mut doomed = self.tree.descendants(id);
        doomed.push(id);

        if self.selection.is_some_and(|s| doomed.contains(&s)) {
            self.selection = None;
        }
        if self.gesture.active().is_some_and(|g| doomed.contains(&g.target)) {
            self.gesture = GestureState::Idle;
        }
        for gone in &doomed {
            self.expanded.remove(gone);
        }

        self.tree.delete(id).is_some()
    }

    /// Select `id`, or clear the selection with `None`. Unknown ids are
    /// ignored.
    pub fn select(&mut self, id: Option<ElementId>) -> bool {
        if let Some(id) = id
            && !self.tree.contains(id)
        {
            log::debug!("select: {id:?} not found");
            return false;
        }
        let changed = self.selection != id;
        self.selection = id;
        changed
    }

    pub fn toggle_expanded(&mut self, id: ElementId) -> bool {
        if !self.tree.contains(id) {
            log::debug!("toggle_expanded: {id:?} not found");
            return false;
        }
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
        true
    }

    /// Apply a property panel edit. Rejected edits leave the element as is.
    pub fn apply_edit(&mut self, edit: &PropertyEdit) -> bool {
        let Some(el) = self.tree.find_by_id_mut(edit.element_id) else {
            log::debug!("apply_edit: {:?} not found", edit.element_id);
            return false;
        };
        match el.properties.set_path(&edit.path, &edit.value) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("apply_edit on {:?} ignored: {e}", edit.element_id);
                false
            }
        }
    }

    /// Explorer drop: reparent and expand the drop target.
    pub fn drop_on(&mut self, drop: &TreeDrop) -> bool {
        match self.tree.reparent(drop.dragged_id, drop.target_id) {
            Ok(()) => {
                self.expanded.insert(drop.target_id);
                true
            }
            Err(e) => {
                log::debug!("drop rejected: {e}");
                false
            }
        }
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerKind::Down => self.pointer_down(event.x, event.y, event.target),
            PointerKind::Move => self.pointer_move(event.x, event.y),
            PointerKind::Up => self.pointer_up(),
            PointerKind::Cancel => self.pointer_cancel(),
        }
    }

    /// Start a gesture (or change the selection) according to what the
    /// pointer landed on. `None` classifies against the current overlay.
    pub fn pointer_down(&mut self, x: f32, y: f32, target: Option<PointerTarget>) -> bool {
        let render = self.render_tree();
        let target = target.unwrap_or_else(|| {
            let overlay = self.overlay_for(&render);
            classify(&render, overlay.as_ref(), x, y)
        });
        self.gesture = GestureState::Idle;

        match target {
            PointerTarget::Background => {
                let changed = self.selection.is_some();
                self.selection = None;
                changed
            }
            PointerTarget::Element { id } => {
                if !self.tree.contains(id) {
                    log::debug!("pointer_down: {id:?} not found");
                    return false;
                }
                self.selection = Some(id);
                self.begin(&render, id, GestureMode::Moving, (x, y));
                true
            }
            PointerTarget::ResizeHandle { direction } => {
                self.begin_on_selection(&render, GestureMode::Resizing(ResizeHandle::Directional(direction)), (x, y))
            }
            PointerTarget::CombinedHandle => {
                self.begin_on_selection(&render, GestureMode::Resizing(ResizeHandle::Combined), (x, y))
            }
            PointerTarget::RadiusHandle => {
                let Some(corner) = self.corner_target() else {
                    log::debug!("pointer_down: no corner decorator on {:?}", self.selection);
                    return false;
                };
                self.begin(&render, corner, GestureMode::AdjustingRadius, (x, y))
            }
            PointerTarget::RotateHandle => {
                let Some(center) = self
                    .live_selection()
                    .and_then(|id| render.placement(id))
                    .map(|p| p.center())
                else {
                    log::debug!("pointer_down: rotate without selection");
                    return false;
                };
                self.begin_on_selection(&render, GestureMode::Rotating { center }, (x, y))
            }
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        let GestureState::Active(gesture) = &self.gesture else {
            return false;
        };
        let Some(el) = self.tree.find_by_id_mut(gesture.target) else {
            log::debug!("pointer_move: {:?} no longer exists", gesture.target);
            return false;
        };
        gesture.apply(&mut el.properties, x, y, &self.config);
        true
    }

    /// End the gesture; whatever the last move wrote stays.
    pub fn pointer_up(&mut self) -> bool {
        let was_active = !self.gesture.is_idle();
        self.gesture = GestureState::Idle;
        was_active
    }

    /// Same as `pointer_up`: the snapshot is dropped without rollback.
    pub fn pointer_cancel(&mut self) -> bool {
        self.pointer_up()
    }

    fn live_selection(&self) -> Option<ElementId> {
        self.selection.filter(|id| self.tree.contains(*id))
    }

    /// The selection itself if it is a corner decorator, otherwise its
    /// first corner decorator child.
    fn corner_target(&self) -> Option<ElementId> {
        let selected = self.live_selection()?;
        let el = self.tree.find_by_id(selected)?;
        if el.kind() == ElementKind::UICorner {
            Some(selected)
        } else {
            self.tree.first_child_of_kind(selected, ElementKind::UICorner)
        }
    }

    fn begin_on_selection(&mut self, render: &RenderTree, mode: GestureMode, start: (f32, f32)) -> bool {
        match self.live_selection() {
            Some(id) => self.begin(render, id, mode, start),
            None => {
                log::debug!("pointer_down: {mode:?} without a live selection");
                false
            }
        }
    }

    fn begin(&mut self, render: &RenderTree, target: ElementId, mode: GestureMode, start: (f32, f32)) -> bool {
        let Some(el) = self.tree.find_by_id(target) else {
            return false;
        };
        let Some(placement) = render.placement(target) else {
            log::debug!("begin: {target:?} is not placed on the canvas");
            return false;
        };
        let box_size = (placement.bounds.width, placement.bounds.height);
        log::trace!("begin {mode:?} on {target:?} at {start:?}");
        self.gesture = GestureState::Active(ActiveGesture::new(
            target,
            mode,
            start,
            el.properties.clone(),
            box_size,
        ));
        true
    }

    // ─── Outputs ─────────────────────────────────────────────────────────

    pub fn render_tree(&self) -> RenderTree {
        build_render_tree(&self.tree, self.viewport)
    }

    fn overlay_for(&self, render: &RenderTree) -> Option<SelectionOverlay> {
        selection_overlay(render, self.live_selection()?, self.config.handle_mode)
    }

    pub fn selection_overlay(&self) -> Option<SelectionOverlay> {
        self.overlay_for(&self.render_tree())
    }

    /// Classify a canvas point the way `pointer_down` would.
    pub fn classify(&self, x: f32, y: f32) -> PointerTarget {
        let render = self.render_tree();
        let overlay = self.overlay_for(&render);
        classify(&render, overlay.as_ref(), x, y)
    }

    pub fn explorer_rows(&self) -> Vec<ExplorerRow> {
        explorer_rows(&self.tree, &self.expanded, self.selection)
    }

    /// Panel rows for the selected element; empty without a selection.
    pub fn property_fields(&self) -> Vec<PropertyField> {
        let Some(el) = self.live_selection().and_then(|id| self.tree.find_by_id(id)) else {
            return Vec::new();
        };
        let props = &el.properties;
        props
            .fields()
            .into_iter()
            .map(|key| PropertyField {
                key,
                path: key.path(),
                label: key.label(),
                group: key.group(),
                value_type: key.value_type(),
                value: props.get(key).map(|v| v.to_string()).unwrap_or_default(),
            })
            .collect()
    }

    pub fn generate_code(&self) -> String {
        generate(&self.tree, &self.config.codegen)
    }
}
