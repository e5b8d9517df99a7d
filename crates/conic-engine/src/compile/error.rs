use std::fmt;

/// Failure to build a render object from its description.
///
/// Every variant is fatal for the drawable being compiled; nothing is
/// skipped or truncated silently.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// Attribute format string not in the supported set.
    UnsupportedFormat { format: String },
    /// A vertex row does not carry a value for a declared attribute.
    MissingField { field: String, row: usize },
    /// A vertex row supplies fewer components than the attribute format needs.
    ComponentMismatch {
        field: String,
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Float data for an integer attribute, or the reverse.
    ValueKind { field: String, row: usize },
    /// More components were written than the attribute buffer can hold.
    BufferOverflow {
        field: String,
        row: usize,
        position: usize,
        capacity: usize,
    },
    /// Compute is configured but has no particles or no seed data.
    MissingComputeBuffer { label: String },
    /// Compute seed data does not match `particle_count` times the particle layout.
    ComputeLength {
        label: String,
        expected: usize,
        found: usize,
    },
    /// No vertex rows were supplied.
    EmptyGeometry { label: String },
}

impl CompileError {
    /// Whether this error stems from an invalid description rather than
    /// from data exceeding its declared capacity.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, CompileError::BufferOverflow { .. })
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::UnsupportedFormat { format } => {
                write!(f, "unsupported attribute format `{format}`")
            }
            CompileError::MissingField { field, row } => {
                write!(f, "vertex row {row} has no value for attribute `{field}`")
            }
            CompileError::ComponentMismatch {
                field,
                row,
                expected,
                found,
            } => write!(
                f,
                "vertex row {row} supplies {found} components for attribute `{field}`, \
                 expected {expected}"
            ),
            CompileError::ValueKind { field, row } => {
                write!(f, "vertex row {row} has the wrong numeric kind for attribute `{field}`")
            }
            CompileError::BufferOverflow {
                field,
                row,
                position,
                capacity,
            } => write!(
                f,
                "attribute `{field}` overflowed at position {position} \
                 (capacity {capacity}) while writing row {row}"
            ),
            CompileError::MissingComputeBuffer { label } => {
                write!(f, "`{label}`: compute configured without particles or seed buffer")
            }
            CompileError::ComputeLength { label, expected, found } => write!(
                f,
                "`{label}`: compute seed buffer has {found} floats, expected {expected}"
            ),
            CompileError::EmptyGeometry { label } => write!(f, "`{label}`: no vertex rows"),
        }
    }
}

impl std::error::Error for CompileError {}
