pub mod codegen;
pub mod fields;
pub mod id;
pub mod layout;
pub mod model;
pub mod tree;

pub use codegen::{CodegenConfig, generate};
pub use fields::{EditError, FieldKey, PropertyValue, ValueType, fields_for};
pub use id::ElementId;
pub use layout::{ResolvedBox, Viewport, resolve_layout};
pub use model::*;
pub use tree::{Element, SceneTree, Subtree, TreeError};
