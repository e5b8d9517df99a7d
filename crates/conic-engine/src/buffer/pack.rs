/// One member of a uniform block.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Scalar(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

impl UniformValue {
    /// Number of components written for this value.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            UniformValue::Scalar(_) => 1,
            UniformValue::Vec2(_) => 2,
            UniformValue::Vec3(_) => 3,
            UniformValue::Vec4(_) => 4,
        }
    }

    /// Required start alignment, in components.
    ///
    /// `vec3` aligns like `vec4`. Scalars never force padding before them.
    #[inline]
    pub fn align(&self) -> usize {
        match self {
            UniformValue::Scalar(_) => 1,
            UniformValue::Vec2(_) => 2,
            UniformValue::Vec3(_) | UniformValue::Vec4(_) => 4,
        }
    }

    #[inline]
    fn components(&self) -> &[f32] {
        match self {
            UniformValue::Scalar(v) => std::slice::from_ref(v),
            UniformValue::Vec2(v) => v,
            UniformValue::Vec3(v) => v,
            UniformValue::Vec4(v) => v,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Scalar(v)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(v: [f32; 2]) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self {
        UniformValue::Vec4(v)
    }
}

#[inline]
fn align_up(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}

/// Final packed length (components) for `values`, padded to a multiple of 4.
pub fn packed_len(values: &[UniformValue]) -> usize {
    let end = values
        .iter()
        .fold(0, |offset, v| align_up(offset, v.align()) + v.len());
    align_up(end, 4)
}

/// Packs `values` into one aligned block.
///
/// Two passes: the first sizes the block, the second writes each value at
/// its aligned offset. Gaps are zero-filled.
pub fn pack_uniforms(values: &[UniformValue]) -> Vec<f32> {
    let mut out = vec![0.0f32; packed_len(values)];

    let mut offset = 0;
    for v in values {
        offset = align_up(offset, v.align());
        let comps = v.components();
        out[offset..offset + comps.len()].copy_from_slice(comps);
        offset += comps.len();
    }

    out
}
