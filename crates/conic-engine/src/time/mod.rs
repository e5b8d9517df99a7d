//! Frame timing.
//!
//! One `FrameClock` per window; `tick()` once per painted frame. Drawables
//! typically read `FrameTime::elapsed` from their params getter.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
