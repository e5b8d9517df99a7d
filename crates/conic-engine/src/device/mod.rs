//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain) and its depth target
//! - acquiring frames and providing encoders/views for rendering
//! - tracking device loss

mod ctx;
mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use ctx::RenderCtx;
pub use error::{DeviceError, SurfaceErrorAction};
pub use frame::GpuFrame;
pub use gpu::{DeviceLostHandler, Gpu};
pub use init::GpuInit;
