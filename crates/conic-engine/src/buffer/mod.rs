//! Uniform block packing.
//!
//! Uniform buffers require vector members to start on aligned offsets. The
//! packer lays out heterogeneous scalars and vectors into one contiguous
//! `f32` block ready for a single upload.

mod pack;

pub use pack::{pack_uniforms, packed_len, UniformValue};
