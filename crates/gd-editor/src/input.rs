//! Input abstraction layer.
//!
//! Everything a host feeds the editor: pointer events from any pointing
//! device, property panel edits, explorer drag-and-drop and commands.
//! All of it deserializes from JSON so a web host can pass events through
//! the WASM bridge untouched.

use gd_core::{ElementId, ElementKind};
use serde::{Deserialize, Serialize};

pub use gd_render::{HandleDirection, PointerTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    /// Mouse down, touch start.
    Down,
    Move,
    Up,
    /// Touch cancelled or pointer lost; ends a gesture like `Up`.
    Cancel,
}

/// A normalized pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    /// What a `down` landed on. When absent the editor classifies the
    /// point itself against its render tree and selection overlay.
    #[serde(default)]
    pub target: Option<PointerTarget>,
}

impl PointerEvent {
    pub fn down(x: f32, y: f32, target: PointerTarget) -> Self {
        Self {
            kind: PointerKind::Down,
            x,
            y,
            target: Some(target),
        }
    }

    /// A `down` the editor classifies on its own.
    pub fn down_at(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Down,
            x,
            y,
            target: None,
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Move,
            x,
            y,
            target: None,
        }
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Up,
            x,
            y,
            target: None,
        }
    }

    pub fn cancel() -> Self {
        Self {
            kind: PointerKind::Cancel,
            x: 0.0,
            y: 0.0,
            target: None,
        }
    }
}

/// A property panel edit: raw field text for a dotted property path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyEdit {
    pub element_id: ElementId,
    /// e.g. `Position.Offset.X`.
    pub path: String,
    pub value: String,
}

/// An explorer drag-and-drop: make `dragged_id` the last child of `target_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDrop {
    pub dragged_id: ElementId,
    pub target_id: ElementId,
}

/// Discrete editor commands from toolbar, explorer and keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Add { kind: ElementKind },
    Delete { id: ElementId },
    /// `None` clears the selection.
    Select { id: Option<ElementId> },
    ToggleExpanded { id: ElementId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pointer_event_from_json() {
        let ev: PointerEvent = serde_json::from_str(
            r#"{"kind":"down","x":10,"y":20,"target":{"type":"resize_handle","direction":"sw"}}"#,
        )
        .unwrap();
        assert_eq!(ev.kind, PointerKind::Down);
        assert_eq!(
            ev.target,
            Some(PointerTarget::ResizeHandle {
                direction: HandleDirection::SW
            })
        );

        let mv: PointerEvent = serde_json::from_str(r#"{"kind":"move","x":1.5,"y":2}"#).unwrap();
        assert_eq!(mv, PointerEvent::moved(1.5, 2.0));
    }

    #[test]
    fn commands_from_json() {
        let add: Command = serde_json::from_str(r#"{"type":"add","kind":"TextButton"}"#).unwrap();
        assert_eq!(
            add,
            Command::Add {
                kind: ElementKind::TextButton
            }
        );

        let clear: Command = serde_json::from_str(r#"{"type":"select","id":null}"#).unwrap();
        assert_eq!(clear, Command::Select { id: None });

        let drop: TreeDrop =
            serde_json::from_str(r#"{"dragged_id":2,"target_id":1}"#).unwrap();
        assert_eq!(drop.dragged_id, ElementId::new(2));
    }
}
