//! Editor configuration.

use gd_core::CodegenConfig;

pub use gd_render::HandleMode;

/// Tunables for gestures, handle layout and code generation.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Floor for size offsets during interactive resize.
    pub min_size: f32,
    /// Combined-handle drags need both deltas beyond this before resizing
    /// diagonally.
    pub dead_zone: f32,
    pub handle_mode: HandleMode,
    /// Pick `handle_mode` from the viewport width on every `set_viewport`.
    pub auto_handle_mode: bool,
    /// Viewports wider than this get directional handles.
    pub desktop_breakpoint: f32,
    pub codegen: CodegenConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_size: 20.0,
            dead_zone: 10.0,
            handle_mode: HandleMode::Directional,
            auto_handle_mode: true,
            desktop_breakpoint: 768.0,
            codegen: CodegenConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn handle_mode_for(&self, viewport_width: f32) -> HandleMode {
        if viewport_width > self.desktop_breakpoint {
            HandleMode::Directional
        } else {
            HandleMode::Combined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_is_exclusive() {
        let config = EditorConfig::default();
        assert_eq!(config.handle_mode_for(1024.0), HandleMode::Directional);
        assert_eq!(config.handle_mode_for(768.0), HandleMode::Combined);
        assert_eq!(config.handle_mode_for(375.0), HandleMode::Combined);
    }
}
