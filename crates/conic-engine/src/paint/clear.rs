//! Degenerate clear pipeline.
//!
//! Draws one point outside clip space. Nothing is rasterized; the pass exists
//! so its clear load ops run on frames with nothing to draw.

use super::{blend_state, depth_state};

const CLEAR_WGSL: &str = r#"
@vertex
fn vertex_main(@builtin(vertex_index) index: u32) -> @builtin(position) vec4<f32> {
    return vec4<f32>(2.0, 2.0, 0.0, 1.0);
}

@fragment
fn fragment_main() -> @location(0) vec4<f32> {
    return vec4<f32>(0.0, 0.0, 0.0, 0.0);
}
"#;

pub(super) struct ClearPipeline {
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
}

impl ClearPipeline {
    pub(super) fn matches(&self, color: wgpu::TextureFormat, depth: wgpu::TextureFormat) -> bool {
        self.color_format == color && self.depth_format == depth
    }

    #[inline]
    pub(super) fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub(super) fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("conic clear shader"),
            source: wgpu::ShaderSource::Wgsl(CLEAR_WGSL.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("conic clear layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("conic clear pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vertex_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fragment_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(blend_state()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::PointList,
                ..Default::default()
            },
            depth_stencil: Some(depth_state(depth_format)),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            color_format,
            depth_format,
            pipeline,
        }
    }
}
