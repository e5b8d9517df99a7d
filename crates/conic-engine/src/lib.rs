//! Conic engine crate.
//!
//! A declarative 3D rendering core on wgpu: applications describe each frame
//! as a tree of compiled drawables, the painter turns it into compute and
//! render passes seen through a cone-back perspective camera, and pointer
//! events are routed to interaction regions on the drawables.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod buffer;
pub mod scene;
pub mod compile;
pub mod perspective;
pub mod paint;
pub mod hit;
pub mod context;

pub use context::RenderContext;
