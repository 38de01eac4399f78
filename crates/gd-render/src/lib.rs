pub mod hit;
pub mod overlay;
pub mod scene;

pub use hit::{PointerTarget, classify, hit_test};
pub use overlay::{Handle, HandleDirection, HandleKind, HandleMode, SelectionOverlay, selection_overlay};
pub use scene::{Placement, RenderNode, RenderTree, build_render_tree};
