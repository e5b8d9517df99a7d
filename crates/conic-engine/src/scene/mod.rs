//! Scene graph types.
//!
//! Responsibilities:
//! - describe one frame as a tree of groups and drawables
//! - attach interaction regions and their pointer handlers to drawables
//! - address drawables by child-index paths so pointer state survives rebuilds
//!
//! The tree is rebuilt wholesale every frame and treated as immutable while
//! it is painted or hit-tested.

mod dispatch;
mod node;
mod path;
mod region;

pub use dispatch::Dispatcher;
pub use node::{Drawable, SceneNode};
pub use path::HeldPath;
pub use region::{InteractionRegion, PointerHandler, PointerHandlers};
