//! Input subsystem.
//!
//! Event types and pointer state are platform-agnostic. `platform::winit`
//! translates window events into `InputEvent`s for the runtime.

pub mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{
    InputEvent,
    MouseButton,
    MouseWheelDelta,
    PointerEvent,
    PointerKind,
    PointerPhase,
};
