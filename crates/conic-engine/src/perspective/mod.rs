//! Camera state and the cone-back projection.
//!
//! The projection is a rational depth mapping rather than a perspective
//! divide: `screen_scale = (s + 1) / (r + s)` where `r` is the depth ratio
//! against a fixed reference distance and `s` is the cone-back factor. Near
//! and far objects both stay visible; the mapping diverges at `r = -s`, which
//! is where hit-testing culls.

mod camera;
mod store;

pub use camera::{Camera, Projected};
pub use store::{CameraStore, FileStore, MemoryStore};
