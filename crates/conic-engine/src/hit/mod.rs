//! Pointer hit-testing against interaction regions.
//!
//! Regions are spheres in world space. Each is projected through the camera
//! and accepted when the pointer falls inside its screen radius plus a
//! device-dependent tolerance. Presses pin the winning drawable by path so
//! drags keep reaching it across scene rebuilds.

mod config;
mod engine;

pub use config::HitConfig;
pub use engine::{find_hit, Hit, HitEngine};
