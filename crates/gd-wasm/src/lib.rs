//! WASM bridge for GUI Draft: exposes the editor engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the DOM:
//! it forwards pointer, panel and explorer events here (as plain arguments
//! or JSON) and re-renders from the JSON outputs whenever a call returns
//! `true`.

use gd_core::{ElementId, ElementKind, Viewport};
use gd_editor::{Command, EditorConfig, EditorState, PointerEvent, PropertyEdit, TreeDrop};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

/// The main WASM-facing editor controller.
#[wasm_bindgen]
pub struct GdEditor {
    state: EditorState,
}

#[wasm_bindgen]
impl GdEditor {
    /// Create an editor for a canvas of the given size.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Self {
        console_error_panic_hook_setup();
        Self {
            state: EditorState::new(EditorConfig::default(), Viewport { width, height }),
        }
    }

    /// Resize the canvas. May switch between directional and combined
    /// resize handles.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.state.set_viewport(width, height)
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Pointer down at a canvas point; the editor classifies the target.
    pub fn handle_pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.state.pointer_down(x, y, None)
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.state.pointer_move(x, y)
    }

    pub fn handle_pointer_up(&mut self) -> bool {
        self.state.pointer_up()
    }

    pub fn handle_pointer_cancel(&mut self) -> bool {
        self.state.pointer_cancel()
    }

    /// A full `PointerEvent` as JSON, for hosts that classify targets
    /// themselves. Malformed JSON is ignored.
    pub fn handle_pointer_json(&mut self, json: &str) -> bool {
        decode::<PointerEvent>(json).is_some_and(|ev| self.state.handle_pointer(&ev))
    }

    // ─── Panel, explorer, commands ───────────────────────────────────────

    pub fn set_property(&mut self, element_id: u32, path: &str, value: &str) -> bool {
        self.state.apply_edit(&PropertyEdit {
            element_id: ElementId::new(element_id),
            path: path.to_string(),
            value: value.to_string(),
        })
    }

    pub fn apply_edit_json(&mut self, json: &str) -> bool {
        decode::<PropertyEdit>(json).is_some_and(|edit| self.state.apply_edit(&edit))
    }

    /// Explorer drop of `dragged_id` onto `target_id`.
    pub fn drop_on(&mut self, dragged_id: u32, target_id: u32) -> bool {
        self.state.drop_on(&TreeDrop {
            dragged_id: ElementId::new(dragged_id),
            target_id: ElementId::new(target_id),
        })
    }

    pub fn command_json(&mut self, json: &str) -> bool {
        decode::<Command>(json).is_some_and(|cmd| self.state.command(&cmd))
    }

    /// Add an element by class name. Returns its id, or `None` for an
    /// unknown class.
    pub fn add_element(&mut self, kind: &str) -> Option<u32> {
        let Some(kind) = ElementKind::parse(kind) else {
            log::debug!("add_element: unknown class {kind:?}");
            return None;
        };
        Some(self.state.add(kind).get())
    }

    pub fn delete_element(&mut self, id: u32) -> bool {
        self.state.delete(ElementId::new(id))
    }

    /// Select an element, or clear the selection with `undefined`.
    pub fn select(&mut self, id: Option<u32>) -> bool {
        self.state.select(id.map(ElementId::new))
    }

    pub fn toggle_expanded(&mut self, id: u32) -> bool {
        self.state.toggle_expanded(ElementId::new(id))
    }

    pub fn get_selected_id(&self) -> Option<u32> {
        self.state.selection().map(ElementId::get)
    }

    // ─── Outputs ─────────────────────────────────────────────────────────

    pub fn render_tree_json(&self) -> String {
        encode(&self.state.render_tree(), "{\"roots\":[]}")
    }

    /// Selection overlay as JSON, `null` without a selection.
    pub fn selection_overlay_json(&self) -> String {
        encode(&self.state.selection_overlay(), "null")
    }

    pub fn classify_json(&self, x: f32, y: f32) -> String {
        encode(&self.state.classify(x, y), "{\"type\":\"background\"}")
    }

    pub fn explorer_json(&self) -> String {
        encode(&self.state.explorer_rows(), "[]")
    }

    pub fn property_fields_json(&self) -> String {
        encode(&self.state.property_fields(), "[]")
    }

    /// Class names offered by the add menu.
    pub fn element_kinds_json(&self) -> String {
        let names: Vec<&str> = ElementKind::ALL.iter().map(|k| k.class_name()).collect();
        encode(&names, "[]")
    }

    pub fn generate_code(&self) -> String {
        self.state.generate_code()
    }
}

fn decode<T: DeserializeOwned>(json: &str) -> Option<T> {
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("ignoring malformed event JSON: {e}");
            None
        }
    }
}

fn encode<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("GUI Draft WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn add_drag_and_export() {
        let mut editor = GdEditor::new(1024.0, 768.0);
        let frame = editor.add_element("Frame").unwrap();
        assert_eq!(editor.get_selected_id(), Some(frame));
        assert_eq!(editor.add_element("Part"), None);

        assert!(editor.handle_pointer_down(100.0, 100.0));
        assert!(editor.handle_pointer_move(120.0, 100.0));
        assert!(editor.handle_pointer_up());

        let code = editor.generate_code();
        assert!(code.contains("Frame1.Position = UDim2.new(0, 70, 0, 50)\n"));
    }

    #[test]
    fn json_inputs_and_outputs() {
        let mut editor = GdEditor::new(1024.0, 768.0);
        assert!(editor.command_json(r#"{"type":"add","kind":"Frame"}"#));
        assert!(editor.command_json(r#"{"type":"add","kind":"TextLabel"}"#));
        assert!(editor.drop_on(2, 1));
        assert!(editor.apply_edit_json(
            r#"{"element_id":2,"path":"Text","value":"Hello"}"#
        ));
        assert!(!editor.apply_edit_json("{not json"));
        assert!(!editor.command_json(r#"{"type":"explode"}"#));

        let rows: serde_json::Value = serde_json::from_str(&editor.explorer_json()).unwrap();
        assert_eq!(rows.as_array().map(Vec::len), Some(2));
        assert_eq!(rows[1]["name"], "TextLabel2");

        let render: serde_json::Value = serde_json::from_str(&editor.render_tree_json()).unwrap();
        assert_eq!(render["roots"][0]["children"][0]["text"]["text"], "Hello");

        let target: serde_json::Value = serde_json::from_str(&editor.classify_json(5.0, 5.0)).unwrap();
        assert_eq!(target["type"], "background");
    }

    #[test]
    fn overlay_is_null_without_selection() {
        let mut editor = GdEditor::new(800.0, 600.0);
        assert_eq!(editor.selection_overlay_json(), "null");
        editor.add_element("TextButton");
        assert!(editor.selection_overlay_json().contains("\"handles\""));
        assert!(editor.select(None));
        assert_eq!(editor.selection_overlay_json(), "null");
    }
}
