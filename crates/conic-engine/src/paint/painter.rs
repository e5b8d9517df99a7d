use wgpu::util::DeviceExt;

use crate::compile::RenderObject;
use crate::context::RenderContext;
use crate::coords::ColorRgba;
use crate::device::Gpu;

use super::clear::ClearPipeline;
use super::{DrawCall, FramePlan, LoadMode, PaintError, PassCmd, Paintable};

/// Encodes and submits frames for a [`RenderContext`].
///
/// Not reentrant. Callers serialize `paint` on the rendering thread.
pub struct Painter {
    clear_color: ColorRgba,
    clear: Option<ClearPipeline>,
}

impl Default for Painter {
    fn default() -> Self {
        Self::new()
    }
}

/// Attachments of the frame being encoded.
struct Targets<'a> {
    color: &'a wgpu::TextureView,
    depth: &'a wgpu::TextureView,
}

impl Painter {
    pub fn new() -> Self {
        Self {
            clear_color: ColorRgba::black(),
            clear: None,
        }
    }

    #[inline]
    pub fn clear_color(&self) -> ColorRgba {
        self.clear_color
    }

    /// Color used by the clearing pass of each frame.
    pub fn set_clear_color(&mut self, color: ColorRgba) {
        self.clear_color = color;
    }

    /// Paints one frame of `ctx` and submits it.
    ///
    /// A lost device abandons the frame before anything is recorded. Surface
    /// errors are mapped by the device layer and returned; the frame counter
    /// only advances for frames that are actually encoded.
    pub fn paint(&mut self, gpu: &mut Gpu<'_>, ctx: &mut RenderContext) -> Result<(), PaintError> {
        if gpu.is_lost() {
            return Err(PaintError::DeviceLost);
        }

        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => return Err(PaintError::Surface(gpu.handle_surface_error(err))),
        };

        let color_format = gpu.surface_format();
        let depth_format = gpu.depth_format();
        if !self
            .clear
            .as_ref()
            .is_some_and(|c| c.matches(color_format, depth_format))
        {
            self.clear = Some(ClearPipeline::new(gpu.device(), color_format, depth_format));
        }

        let plan = ctx.plan_frame();
        let targets = Targets {
            color: &frame.view,
            depth: gpu.depth_view(),
        };
        self.encode(gpu.device(), &mut frame.encoder, &targets, &plan);
        drop(plan);

        if gpu.is_lost() {
            log::warn!("device lost while encoding; frame abandoned");
            return Err(PaintError::DeviceLost);
        }

        gpu.submit(frame);
        Ok(())
    }

    fn encode(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        targets: &Targets<'_>,
        plan: &FramePlan<'_, RenderObject>,
    ) {
        for pass in plan.passes() {
            match pass {
                PassCmd::Compute {
                    object,
                    read,
                    workgroups,
                    params,
                    ..
                } => {
                    let Some(state) = object.compute_state() else {
                        continue;
                    };
                    let uniforms = uniform_group(
                        device,
                        &state.uniform_layout,
                        object.label(),
                        plan.camera(),
                        params,
                    );

                    let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                        label: Some(object.label()),
                        timestamp_writes: None,
                    });
                    cpass.set_pipeline(&state.pipeline);
                    cpass.set_bind_group(0, &uniforms, &[]);
                    cpass.set_bind_group(1, &state.storage_groups[*read], &[]);
                    cpass.dispatch_workgroups(*workgroups, 1, 1);
                }

                PassCmd::Render {
                    object,
                    load,
                    draw,
                    particles,
                    params,
                } => {
                    let uniforms = uniform_group(
                        device,
                        object.uniform_layout(),
                        object.label(),
                        plan.camera(),
                        params,
                    );

                    let mut rpass = self.begin_pass(encoder, targets, object.label(), *load);
                    rpass.set_pipeline(object.pipeline());
                    rpass.set_bind_group(0, &uniforms, &[]);
                    if let Some(textures) = object.texture_group() {
                        rpass.set_bind_group(1, textures, &[]);
                    }

                    let mut slot = 0;
                    if let (Some(write), Some(state)) = (particles, object.compute_state()) {
                        rpass.set_vertex_buffer(slot, state.buffers[*write].slice(..));
                        slot += 1;
                    }
                    for buffer in object.vertex_buffers() {
                        rpass.set_vertex_buffer(slot, buffer.slice(..));
                        slot += 1;
                    }

                    match *draw {
                        DrawCall::Indexed { count, instances } => {
                            if let Some(indices) = object.index_buffer() {
                                rpass.set_index_buffer(
                                    indices.slice(..),
                                    wgpu::IndexFormat::Uint32,
                                );
                                rpass.draw_indexed(0..count, 0, 0..instances);
                            }
                        }
                        DrawCall::Vertices { count, instances } => {
                            rpass.draw(0..count, 0..instances);
                        }
                    }
                }

                PassCmd::Clear => {
                    let Some(clear) = self.clear.as_ref() else {
                        continue;
                    };
                    let mut rpass =
                        self.begin_pass(encoder, targets, "conic clear", LoadMode::Clear);
                    rpass.set_pipeline(clear.pipeline());
                    rpass.draw(0..1, 0..1);
                }
            }
        }
    }

    fn begin_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        targets: &Targets<'_>,
        label: &str,
        load: LoadMode,
    ) -> wgpu::RenderPass<'e> {
        let (color_load, depth_load) = match load {
            LoadMode::Clear => (
                wgpu::LoadOp::Clear(self.clear_color.to_wgpu()),
                wgpu::LoadOp::Clear(1.0),
            ),
            LoadMode::Load => (wgpu::LoadOp::Load, wgpu::LoadOp::Load),
        };

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: targets.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: color_load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: targets.depth,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Group 0 for one pass: camera block at binding 0, params at binding 1.
fn uniform_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    camera: &[f32],
    params: &[f32],
) -> wgpu::BindGroup {
    let camera = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label} camera")),
        contents: bytemuck::cast_slice(camera),
        usage: wgpu::BufferUsages::UNIFORM,
    });
    let params = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label} params")),
        contents: bytemuck::cast_slice(params),
        usage: wgpu::BufferUsages::UNIFORM,
    });

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label} uniforms")),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: camera.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: params.as_entire_binding(),
            },
        ],
    })
}
