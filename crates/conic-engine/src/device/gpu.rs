use std::sync::{Arc, Mutex};

use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface;
use super::{DeviceError, GpuFrame, GpuInit, RenderCtx, SurfaceErrorAction};

/// Callback invoked once when the device is lost.
pub type DeviceLostHandler = Box<dyn FnMut(&DeviceError) + Send>;

#[derive(Default)]
struct LossState {
    error: Option<DeviceError>,
    handler: Option<DeviceLostHandler>,
}

impl LossState {
    /// Runs the handler, then keeps `error` for later queries.
    fn record(&mut self, error: DeviceError) {
        if let Some(handler) = self.handler.as_mut() {
            handler(&error);
        }
        self.error = Some(error);
    }
}

/// Owns wgpu core objects, the surface configuration and the depth target.
///
/// Responsibilities:
/// - creates and stores Instance/Adapter/Device/Queue
/// - creates and configures the Surface (swapchain)
/// - keeps a depth target sized to the surface
/// - acquires frames and provides an encoder + view for rendering
/// - records device loss
pub struct Gpu<'w> {
    /// Kept alive for the surface.
    _instance: wgpu::Instance,

    /// Surface bound to the window. The window must outlive the `Gpu`.
    surface: wgpu::Surface<'w>,

    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    depth_format: wgpu::TextureFormat,
    _depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,

    loss: Arc<Mutex<LossState>>,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Fails with [`DeviceError::BackendUnavailable`] when no surface, adapter
    /// or device can be obtained. Nothing is retried.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self, DeviceError> {
        let size = window.inner_size();
        if !surface::is_drawable(size) {
            return Err(DeviceError::BackendUnavailable("window has zero size".into()));
        }

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
            depth_format,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| unavailable("failed to create wgpu surface", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| unavailable("failed to find a suitable GPU adapter", e))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("conic device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| unavailable("failed to create wgpu device/queue", e))?;

        let info = adapter.get_info();
        log::info!("using {} ({:?})", info.name, info.backend);

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps, prefer_srgb)
            .ok_or_else(|| DeviceError::BackendUnavailable("no supported surface formats".into()))?;
        let alpha_mode = surface::choose_alpha_mode(&surface_caps, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        let (depth_texture, depth_view) = surface::create_depth_target(&device, depth_format, size);

        let loss = Arc::new(Mutex::new(LossState::default()));
        let lost = Arc::clone(&loss);
        device.set_device_lost_callback(move |reason, message| {
            // Dropping the device on shutdown reports `Destroyed`.
            if matches!(reason, wgpu::DeviceLostReason::Destroyed) {
                return;
            }
            let error = DeviceError::DeviceLost {
                reason: format!("{reason:?}"),
                message,
            };
            log::error!("{error}");
            if let Ok(mut state) = lost.lock() {
                state.record(error);
            }
        });

        Ok(Self {
            _instance: instance,
            surface,
            adapter,
            device,
            queue,
            config,
            size,
            depth_format,
            _depth_texture: depth_texture,
            depth_view,
            loss,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn depth_format(&self) -> wgpu::TextureFormat {
        self.depth_format
    }

    pub(crate) fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Context for compiling drawables against this surface.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(&self.device, &self.queue, self.config.format, self.depth_format)
    }

    /// Reconfigures the surface and rebuilds the depth target after a resize.
    ///
    /// wgpu does not support configuring a surface with a 0x0 size; in that
    /// case only the recorded size changes and configuration is deferred.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if !surface::is_drawable(new_size) {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        let (texture, view) =
            surface::create_depth_target(&self.device, self.depth_format, new_size);
        self._depth_texture = texture;
        self.depth_view = view;
    }

    /// Acquires the next surface texture and creates an encoder.
    pub fn begin_frame(&self) -> Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("conic frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and presents the frame.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    /// Converts a `SurfaceError` into a higher-level action, reconfiguring
    /// lost or outdated surfaces.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let action = surface::surface_error_action(&err);
        if action == SurfaceErrorAction::Reconfigured && surface::is_drawable(self.size) {
            self.surface.configure(&self.device, &self.config);
        }
        if action != SurfaceErrorAction::Reconfigured {
            log::warn!("surface error {err:?}: {action:?}");
        }
        action
    }

    /// Whether the device-lost callback has fired.
    pub fn is_lost(&self) -> bool {
        self.loss.lock().map_or(true, |s| s.error.is_some())
    }

    /// The recorded loss, if any.
    pub fn lost_error(&self) -> Option<DeviceError> {
        self.loss.lock().ok().and_then(|s| s.error.clone())
    }

    /// Installs the callback run when the device is lost. Replaces any
    /// previous handler. Runs on whichever thread wgpu reports the loss from.
    pub fn set_device_lost_handler(&self, handler: impl FnMut(&DeviceError) + Send + 'static) {
        if let Ok(mut state) = self.loss.lock() {
            state.handler = Some(Box::new(handler));
        }
    }
}

fn unavailable(what: &str, err: impl std::fmt::Display) -> DeviceError {
    DeviceError::BackendUnavailable(format!("{what}: {err}"))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn lost() -> DeviceError {
        DeviceError::DeviceLost {
            reason: "Unknown".into(),
            message: "driver reset".into(),
        }
    }

    #[test]
    fn loss_is_recorded_without_handler() {
        let mut state = LossState::default();
        state.record(lost());
        assert_eq!(state.error, Some(lost()));
    }

    #[test]
    fn loss_reaches_handler_before_it_is_stored() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut state = LossState {
            error: None,
            handler: Some(Box::new(move |e: &DeviceError| {
                assert_eq!(e, &lost());
                seen.fetch_add(1, Ordering::SeqCst);
            })),
        };
        state.record(lost());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(state.error.is_some());
    }
}
