//! Frame painter.
//!
//! Painting runs in two stages:
//! - [`FramePlan`] walks the scene depth-first and produces an ordered stream
//!   of compute, render and clear passes (pure, renderer-agnostic)
//! - [`Painter`] encodes that stream into one wgpu command buffer and submits it
//!
//! Every drawable gets its own render pass. Only the first pass of a frame
//! clears color and depth; later passes load and blend on top.

mod clear;
mod error;
mod painter;
mod plan;
mod state;

pub use error::PaintError;
pub use painter::Painter;
pub use plan::{DrawCall, FramePlan, LoadMode, PassCmd, Paintable, WORKGROUP_SIZE};
pub use state::FrameState;

pub(crate) use state::{blend_state, depth_state};
