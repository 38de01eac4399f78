pub mod config;
pub mod explorer;
pub mod gesture;
pub mod input;
pub mod state;

pub use config::{EditorConfig, HandleMode};
pub use explorer::{ExplorerRow, explorer_rows};
pub use gesture::{GestureMode, GestureState, ResizeHandle};
pub use input::{Command, PointerEvent, PointerKind, PointerTarget, PropertyEdit, TreeDrop};
pub use state::{EditorState, PropertyField};
