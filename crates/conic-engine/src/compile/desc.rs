use std::fmt;
use std::rc::Rc;

use crate::buffer::UniformValue;

use super::{AttributeDescriptor, AttributeFormat, VertexRow};

/// Per-frame custom parameter getter. Called once per draw.
pub type ParamsFn = Rc<dyn Fn() -> Vec<UniformValue>>;

/// Primitive assembly mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Topology {
    PointList,
    LineList,
    LineStrip,
    #[default]
    TriangleList,
    TriangleStrip,
}

impl Topology {
    #[inline]
    pub fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            Topology::PointList => wgpu::PrimitiveTopology::PointList,
            Topology::LineList => wgpu::PrimitiveTopology::LineList,
            Topology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            Topology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
            Topology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }

    #[inline]
    pub fn is_strip(self) -> bool {
        matches!(self, Topology::LineStrip | Topology::TriangleStrip)
    }
}

/// Particle simulation attached to a drawable.
///
/// `initial` seeds both halves of the ping-pong storage pair. Each particle is
/// laid out as the interleaved `attributes`, which the render pass reads as
/// instance data.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeConfig {
    pub particle_count: u32,
    pub initial: Vec<f32>,
    pub attributes: Vec<AttributeDescriptor>,
}

impl ComputeConfig {
    pub fn new(particle_count: u32, initial: Vec<f32>) -> Self {
        Self {
            particle_count,
            initial,
            attributes: Vec::new(),
        }
    }

    pub fn attribute(mut self, field: impl Into<String>, format: AttributeFormat) -> Self {
        self.attributes.push(AttributeDescriptor::new(field, format));
        self
    }

    /// Floats per particle implied by the attribute layout.
    pub fn particle_stride(&self) -> usize {
        self.attributes.iter().map(|a| a.format.components()).sum()
    }
}

/// Declarative description of one drawable, consumed by [`compile`](super::compile).
pub struct RenderObjectDesc {
    pub label: String,
    /// WGSL source with `vertex_main`, `fragment_main` and, when compute is
    /// configured, `compute_main` entry points.
    pub shader: String,
    pub topology: Topology,
    pub attributes: Vec<AttributeDescriptor>,
    pub data: Vec<VertexRow>,
    pub indices: Option<Vec<u32>>,
    pub textures: Vec<wgpu::TextureView>,
    pub params: Option<ParamsFn>,
    pub compute: Option<ComputeConfig>,
}

impl RenderObjectDesc {
    pub fn new(shader: impl Into<String>) -> Self {
        Self {
            label: "default".to_string(),
            shader: shader.into(),
            topology: Topology::default(),
            attributes: Vec::new(),
            data: Vec::new(),
            indices: None,
            textures: Vec::new(),
            params: None,
            compute: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn attribute(mut self, field: impl Into<String>, format: AttributeFormat) -> Self {
        self.attributes.push(AttributeDescriptor::new(field, format));
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = VertexRow>) -> Self {
        self.data.extend(rows);
        self
    }

    pub fn indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn texture(mut self, view: wgpu::TextureView) -> Self {
        self.textures.push(view);
        self
    }

    pub fn params(mut self, f: impl Fn() -> Vec<UniformValue> + 'static) -> Self {
        self.params = Some(Rc::new(f));
        self
    }

    pub fn compute(mut self, compute: ComputeConfig) -> Self {
        self.compute = Some(compute);
        self
    }
}

impl fmt::Debug for RenderObjectDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderObjectDesc")
            .field("label", &self.label)
            .field("topology", &self.topology)
            .field("attributes", &self.attributes)
            .field("rows", &self.data.len())
            .field("indices", &self.indices.as_ref().map(Vec::len))
            .field("textures", &self.textures.len())
            .field("params", &self.params.is_some())
            .field("compute", &self.compute)
            .finish()
    }
}
