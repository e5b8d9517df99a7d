//! Render object compiler.
//!
//! Turns a declarative drawable description (shader, topology, attribute
//! layout, row-oriented vertex data, optional indices, textures, params and
//! compute configuration) into GPU resources the painter can schedule.
//!
//! Convention:
//! - one vertex buffer per attribute, offset 0, stride = attribute footprint
//! - indices are always `u32`
//! - shader entry points are `vertex_main`, `fragment_main`, `compute_main`

mod attribute;
mod desc;
pub mod diagnostics;
mod error;
mod object;

pub use attribute::{
    scatter_column, AttributeColumn, AttributeDescriptor, AttributeFormat, VertexRow, VertexValue,
};
pub use desc::{ComputeConfig, ParamsFn, RenderObjectDesc, Topology};
pub use error::CompileError;
pub use object::{compile, prepare_columns, RenderObject};
