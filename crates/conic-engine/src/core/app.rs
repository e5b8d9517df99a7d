use anyhow::Result;
use winit::dpi::PhysicalSize;

use crate::device::Gpu;
use crate::input::InputEvent;

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by the runtime.
///
/// All callbacks run on the event-loop thread, one at a time.
pub trait App {
    /// Called once the window and GPU exist. Compile drawables here.
    /// An error stops the runtime.
    fn on_start(&mut self, window: &WindowCtx<'_>, gpu: &Gpu<'_>) -> Result<()> {
        let _ = (window, gpu);
        Ok(())
    }

    /// Called for every routed input event, including synthesized clicks.
    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called after the surface was resized. Physical pixels.
    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        let _ = size;
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called before the window closes.
    fn on_exit(&mut self) {}
}
