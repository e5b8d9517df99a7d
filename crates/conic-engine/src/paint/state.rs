/// Per-surface frame bookkeeping carried between `paint()` calls.
#[derive(Debug, Clone, Default)]
pub struct FrameState {
    /// True until the first pass of the current frame has cleared the target.
    pub(crate) needs_clear: bool,
    /// Number of frames planned so far. Drives compute ping-pong parity.
    pub(crate) counter: u64,
}

impl FrameState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn counter(&self) -> u64 {
        self.counter
    }

    #[inline]
    pub fn needs_clear(&self) -> bool {
        self.needs_clear
    }

    /// Ping buffer index read by compute passes of the next planned frame.
    #[inline]
    pub fn parity(&self) -> usize {
        (self.counter % 2) as usize
    }
}

/// Fixed blend applied to every drawable: color is src-alpha over dst, alpha
/// accumulates with inverse src alpha.
pub(crate) fn blend_state() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

pub(crate) fn depth_state(format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::LessEqual,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}
