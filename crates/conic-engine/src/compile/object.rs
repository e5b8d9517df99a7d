use std::fmt;

use wgpu::util::DeviceExt;

use crate::buffer::UniformValue;
use crate::device::RenderCtx;
use crate::paint::{DrawCall, Paintable};

use super::attribute::{scatter_column, AttributeColumn};
use super::desc::{ComputeConfig, ParamsFn, RenderObjectDesc, Topology};
use super::{diagnostics, AttributeDescriptor, CompileError};

/// Compiled drawable: GPU buffers, pipelines and the metadata the painter
/// needs to schedule it.
pub struct RenderObject {
    label: String,
    topology: Topology,
    vertex_count: u32,
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    vertex_buffers: Vec<wgpu::Buffer>,
    index_buffer: Option<(wgpu::Buffer, u32)>,
    texture_group: Option<wgpu::BindGroup>,
    params: Option<ParamsFn>,
    compute: Option<ComputeState>,
}

/// Ping-pong particle storage owned by one drawable.
pub(crate) struct ComputeState {
    pub(crate) particle_count: u32,
    pub(crate) pipeline: wgpu::ComputePipeline,
    pub(crate) uniform_layout: wgpu::BindGroupLayout,
    pub(crate) buffers: [wgpu::Buffer; 2],
    /// `storage_groups[p]` reads `buffers[p]` and writes `buffers[(p + 1) % 2]`.
    pub(crate) storage_groups: [wgpu::BindGroup; 2],
}

impl RenderObject {
    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    pub(crate) fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    #[inline]
    pub(crate) fn uniform_layout(&self) -> &wgpu::BindGroupLayout {
        &self.uniform_layout
    }

    #[inline]
    pub(crate) fn vertex_buffers(&self) -> &[wgpu::Buffer] {
        &self.vertex_buffers
    }

    #[inline]
    pub(crate) fn index_buffer(&self) -> Option<&wgpu::Buffer> {
        self.index_buffer.as_ref().map(|(b, _)| b)
    }

    #[inline]
    pub(crate) fn texture_group(&self) -> Option<&wgpu::BindGroup> {
        self.texture_group.as_ref()
    }

    #[inline]
    pub(crate) fn compute_state(&self) -> Option<&ComputeState> {
        self.compute.as_ref()
    }
}

impl Paintable for RenderObject {
    fn label(&self) -> &str {
        &self.label
    }

    fn draw_call(&self) -> DrawCall {
        let instances = self.compute.as_ref().map_or(1, |c| c.particle_count);
        match &self.index_buffer {
            Some((_, count)) => DrawCall::Indexed { count: *count, instances },
            None => DrawCall::Vertices { count: self.vertex_count, instances },
        }
    }

    fn particle_count(&self) -> Option<u32> {
        self.compute.as_ref().map(|c| c.particle_count)
    }

    fn params(&self) -> Vec<UniformValue> {
        match &self.params {
            Some(f) => f(),
            None => vec![UniformValue::Scalar(0.0)],
        }
    }
}

impl fmt::Debug for RenderObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderObject")
            .field("label", &self.label)
            .field("topology", &self.topology)
            .field("vertex_count", &self.vertex_count)
            .field("draw_call", &self.draw_call())
            .field("textures", &self.texture_group.is_some())
            .finish()
    }
}

/// Checks the description and scatters every attribute into its own column.
///
/// Pure CPU work; runs before any GPU resource is created so a bad
/// description never leaves half-built resources behind.
pub fn prepare_columns(desc: &RenderObjectDesc) -> Result<Vec<AttributeColumn>, CompileError> {
    if desc.data.is_empty() {
        return Err(CompileError::EmptyGeometry {
            label: desc.label.clone(),
        });
    }

    if let Some(compute) = &desc.compute {
        validate_compute(&desc.label, compute)?;
    }

    desc.attributes
        .iter()
        .map(|attr| scatter_column(attr, &desc.data))
        .collect()
}

fn validate_compute(label: &str, compute: &ComputeConfig) -> Result<(), CompileError> {
    if compute.particle_count == 0 || compute.initial.is_empty() {
        return Err(CompileError::MissingComputeBuffer {
            label: label.to_string(),
        });
    }

    let stride = compute.particle_stride();
    if stride > 0 {
        let expected = stride * compute.particle_count as usize;
        if compute.initial.len() != expected {
            return Err(CompileError::ComputeLength {
                label: label.to_string(),
                expected,
                found: compute.initial.len(),
            });
        }
    }

    Ok(())
}

/// Builds GPU resources for one drawable.
///
/// Each attribute becomes its own vertex buffer with stride equal to the
/// attribute's footprint. Indices are always 32-bit. Shader diagnostics are
/// requested in the background and never block compilation.
pub fn compile(ctx: &RenderCtx<'_>, desc: RenderObjectDesc) -> Result<RenderObject, CompileError> {
    let columns = prepare_columns(&desc)?;
    let label = desc.label.as_str();
    let device = ctx.device;

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(desc.shader.as_str().into()),
    });
    diagnostics::request(&shader, label, &desc.shader);

    let vertex_buffers: Vec<wgpu::Buffer> = desc
        .attributes
        .iter()
        .zip(&columns)
        .map(|(attr, column)| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} attr {}", attr.field)),
                contents: column.as_bytes(),
                usage: wgpu::BufferUsages::VERTEX,
            })
        })
        .collect();

    let index_buffer = desc
        .indices
        .as_ref()
        .filter(|indices| !indices.is_empty())
        .map(|indices| {
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} indices")),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            (buffer, indices.len() as u32)
        });

    let uniform_layout = uniform_layout(
        device,
        label,
        wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
    );

    let (texture_layout, texture_group) = if desc.textures.is_empty() {
        (None, None)
    } else {
        let (layout, group) = texture_bindings(device, label, &desc.textures);
        (Some(layout), Some(group))
    };

    let compute = desc
        .compute
        .as_ref()
        .map(|cfg| build_compute(device, label, &shader, cfg));

    let mut group_layouts = vec![&uniform_layout];
    if let Some(l) = texture_layout.as_ref() {
        group_layouts.push(l);
    }

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &group_layouts,
        immediate_size: 0,
    });

    // Locations: particle attributes first (instance rate, slot 0), then one
    // slot per vertex attribute.
    let particle_attrs = desc
        .compute
        .as_ref()
        .map(|c| c.attributes.as_slice())
        .unwrap_or_default();
    let instance_attrs = interleaved_attributes(particle_attrs, 0);
    let particle_stride: u64 = particle_attrs.iter().map(|a| a.format.byte_size()).sum();
    let first_vertex_location = particle_attrs.len() as u32;

    let vertex_attrs: Vec<[wgpu::VertexAttribute; 1]> = desc
        .attributes
        .iter()
        .enumerate()
        .map(|(i, attr)| {
            [wgpu::VertexAttribute {
                format: attr.format.to_wgpu(),
                offset: 0,
                shader_location: first_vertex_location + i as u32,
            }]
        })
        .collect();

    let mut layouts = Vec::with_capacity(vertex_attrs.len() + 1);
    if compute.is_some() {
        layouts.push(wgpu::VertexBufferLayout {
            array_stride: particle_stride,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &instance_attrs,
        });
    }
    for (attr, wgpu_attr) in desc.attributes.iter().zip(&vertex_attrs) {
        layouts.push(wgpu::VertexBufferLayout {
            array_stride: attr.format.byte_size(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: wgpu_attr,
        });
    }

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vertex_main"),
            compilation_options: Default::default(),
            buffers: &layouts,
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fragment_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(crate::paint::blend_state()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology.to_wgpu(),
            strip_index_format: (desc.topology.is_strip() && index_buffer.is_some())
                .then_some(wgpu::IndexFormat::Uint32),
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(crate::paint::depth_state(ctx.depth_format)),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    log::debug!(
        "compiled `{label}`: {} vertices, {} attributes, indexed={}, compute={}",
        desc.data.len(),
        desc.attributes.len(),
        index_buffer.is_some(),
        compute.is_some(),
    );

    Ok(RenderObject {
        label: desc.label.clone(),
        topology: desc.topology,
        vertex_count: desc.data.len() as u32,
        pipeline,
        uniform_layout,
        vertex_buffers,
        index_buffer,
        texture_group,
        params: desc.params.clone(),
        compute,
    })
}

/// Group 0 layout shared by render and compute: camera block at binding 0,
/// custom params at binding 1.
fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    let entry = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(&format!("{label} uniforms")),
        entries: &[entry(0), entry(1)],
    })
}

/// Group 1: one filtering sampler at binding 0, textures from binding 1.
fn texture_bindings(
    device: &wgpu::Device,
    label: &str,
    textures: &[wgpu::TextureView],
) -> (wgpu::BindGroupLayout, wgpu::BindGroup) {
    let mut layout_entries = vec![wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }];
    layout_entries.extend((0..textures.len()).map(|i| wgpu::BindGroupLayoutEntry {
        binding: 1 + i as u32,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }));

    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(&format!("{label} textures")),
        entries: &layout_entries,
    });

    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(&format!("{label} sampler")),
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });

    let mut entries = vec![wgpu::BindGroupEntry {
        binding: 0,
        resource: wgpu::BindingResource::Sampler(&sampler),
    }];
    entries.extend(textures.iter().enumerate().map(|(i, view)| wgpu::BindGroupEntry {
        binding: 1 + i as u32,
        resource: wgpu::BindingResource::TextureView(view),
    }));

    let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label} textures")),
        layout: &layout,
        entries: &entries,
    });

    (layout, group)
}

fn interleaved_attributes(
    attrs: &[AttributeDescriptor],
    first_location: u32,
) -> Vec<wgpu::VertexAttribute> {
    let mut offset = 0;
    attrs
        .iter()
        .enumerate()
        .map(|(i, attr)| {
            let a = wgpu::VertexAttribute {
                format: attr.format.to_wgpu(),
                offset,
                shader_location: first_location + i as u32,
            };
            offset += attr.format.byte_size();
            a
        })
        .collect()
}

fn build_compute(
    device: &wgpu::Device,
    label: &str,
    shader: &wgpu::ShaderModule,
    cfg: &ComputeConfig,
) -> ComputeState {
    let make_buffer = |half: usize| {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} particles {half}")),
            contents: bytemuck::cast_slice(&cfg.initial),
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::COPY_DST,
        })
    };
    let buffers = [make_buffer(0), make_buffer(1)];

    let storage_entry = |binding, read_only| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };
    let storage_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(&format!("{label} particle storage")),
        entries: &[storage_entry(0, true), storage_entry(1, false)],
    });

    let storage_group = |read: usize| {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} particle pass {read}")),
            layout: &storage_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffers[read].as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers[(read + 1) % 2].as_entire_binding(),
                },
            ],
        })
    };
    let storage_groups = [storage_group(0), storage_group(1)];

    let uniform_layout = uniform_layout(device, label, wgpu::ShaderStages::COMPUTE);

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{label} compute")),
        bind_group_layouts: &[&uniform_layout, &storage_layout],
        immediate_size: 0,
    });

    let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(&format!("{label} compute")),
        layout: Some(&layout),
        module: shader,
        entry_point: Some("compute_main"),
        compilation_options: Default::default(),
        cache: None,
    });

    ComputeState {
        particle_count: cfg.particle_count,
        pipeline,
        uniform_layout,
        buffers,
        storage_groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{AttributeFormat, VertexRow};

    fn triangle() -> RenderObjectDesc {
        RenderObjectDesc::new("")
            .attribute("position", AttributeFormat::Float32x4)
            .attribute("color", AttributeFormat::Float32x4)
            .rows((0..3).map(|i| {
                VertexRow::new()
                    .with("position", [i as f32, 0.0, 0.0, 1.0])
                    .with("color", [1.0, 1.0, 1.0, 1.0])
            }))
    }

    #[test]
    fn label_defaults_to_default() {
        assert_eq!(RenderObjectDesc::new("").label, "default");
    }

    #[test]
    fn triangle_prepares_one_column_per_attribute() {
        let columns = prepare_columns(&triangle()).unwrap();
        assert_eq!(columns.len(), 2);
        assert!(columns.iter().all(|c| c.len() == 12));
    }

    #[test]
    fn empty_rows_are_rejected() {
        let desc = RenderObjectDesc::new("").label("nothing");
        assert_eq!(
            prepare_columns(&desc).unwrap_err(),
            CompileError::EmptyGeometry { label: "nothing".into() }
        );
    }

    #[test]
    fn compute_without_seed_is_rejected() {
        let desc = triangle().compute(ComputeConfig::new(64, Vec::new()));
        let err = prepare_columns(&desc).unwrap_err();
        assert!(matches!(err, CompileError::MissingComputeBuffer { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn compute_seed_must_match_layout() {
        let cfg = ComputeConfig::new(4, vec![0.0; 10])
            .attribute("pos", AttributeFormat::Float32x2)
            .attribute("vel", AttributeFormat::Float32x2);
        let err = prepare_columns(&triangle().compute(cfg)).unwrap_err();
        assert_eq!(
            err,
            CompileError::ComputeLength {
                label: "default".into(),
                expected: 16,
                found: 10,
            }
        );
    }

    #[test]
    fn interleaved_offsets_accumulate() {
        let attrs = [
            AttributeDescriptor::new("pos", AttributeFormat::Float32x2),
            AttributeDescriptor::new("vel", AttributeFormat::Float32x3),
            AttributeDescriptor::new("id", AttributeFormat::Uint32),
        ];
        let out = interleaved_attributes(&attrs, 0);
        let offsets: Vec<u64> = out.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8, 20]);
        assert_eq!(out[2].shader_location, 2);
    }
}
