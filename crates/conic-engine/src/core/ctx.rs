use winit::window::{Window, WindowId};

use crate::context::RenderContext;
use crate::coords::Viewport;
use crate::device::Gpu;
use crate::input::InputState;
use crate::paint::Painter;
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Surface size in physical pixels.
    pub fn viewport(&self) -> Viewport {
        let size = self.window.inner_size();
        Viewport::new(size.width as f32, size.height as f32)
    }

    pub fn scale_factor(&self) -> f32 {
        self.window.scale_factor() as f32
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// Syncs the viewport, paints `ctx` and presents it.
    ///
    /// Skipped and reconfigured frames continue; a lost device or a fatal
    /// surface error asks the runtime to exit.
    pub fn paint(&mut self, painter: &mut Painter, ctx: &mut RenderContext) -> AppControl {
        ctx.set_viewport(self.window.viewport());
        self.window.window.pre_present_notify();

        match painter.paint(self.gpu, ctx) {
            Ok(()) => AppControl::Continue,
            Err(e) if e.is_fatal() => {
                match self.gpu.lost_error() {
                    Some(cause) => log::error!("stopping: {cause}"),
                    None => log::error!("stopping: {e}"),
                }
                AppControl::Exit
            }
            Err(e) => {
                log::debug!("frame skipped: {e}");
                AppControl::Continue
            }
        }
    }
}
