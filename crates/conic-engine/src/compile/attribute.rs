use std::collections::HashMap;
use std::str::FromStr;

use super::CompileError;

/// Supported per-vertex attribute formats.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttributeFormat {
    Float32,
    Float32x2,
    Float32x3,
    Float32x4,
    Uint32,
}

impl AttributeFormat {
    /// Components per vertex.
    #[inline]
    pub const fn components(self) -> usize {
        match self {
            AttributeFormat::Float32 | AttributeFormat::Uint32 => 1,
            AttributeFormat::Float32x2 => 2,
            AttributeFormat::Float32x3 => 3,
            AttributeFormat::Float32x4 => 4,
        }
    }

    /// Bytes per vertex. Every component is 4 bytes, so this is also the stride.
    #[inline]
    pub const fn byte_size(self) -> u64 {
        self.components() as u64 * 4
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self, AttributeFormat::Uint32)
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::VertexFormat {
        match self {
            AttributeFormat::Float32 => wgpu::VertexFormat::Float32,
            AttributeFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
            AttributeFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
            AttributeFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
            AttributeFormat::Uint32 => wgpu::VertexFormat::Uint32,
        }
    }
}

impl FromStr for AttributeFormat {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "float32" => Ok(AttributeFormat::Float32),
            "float32x2" => Ok(AttributeFormat::Float32x2),
            "float32x3" => Ok(AttributeFormat::Float32x3),
            "float32x4" => Ok(AttributeFormat::Float32x4),
            "uint32" => Ok(AttributeFormat::Uint32),
            other => Err(CompileError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// Named attribute and its format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub field: String,
    pub format: AttributeFormat,
}

impl AttributeDescriptor {
    #[inline]
    pub fn new(field: impl Into<String>, format: AttributeFormat) -> Self {
        Self { field: field.into(), format }
    }

    /// Builds a descriptor from a format name such as `"float32x4"`.
    pub fn parse(field: impl Into<String>, format: &str) -> Result<Self, CompileError> {
        Ok(Self::new(field, format.parse()?))
    }
}

/// Value of one attribute in one vertex row.
#[derive(Debug, Clone, PartialEq)]
pub enum VertexValue {
    F32(f32),
    F32s(Vec<f32>),
    U32(u32),
}

impl From<f32> for VertexValue {
    fn from(v: f32) -> Self {
        VertexValue::F32(v)
    }
}

impl From<u32> for VertexValue {
    fn from(v: u32) -> Self {
        VertexValue::U32(v)
    }
}

impl From<Vec<f32>> for VertexValue {
    fn from(v: Vec<f32>) -> Self {
        VertexValue::F32s(v)
    }
}

impl<const N: usize> From<[f32; N]> for VertexValue {
    fn from(v: [f32; N]) -> Self {
        VertexValue::F32s(v.to_vec())
    }
}

/// One vertex: attribute values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexRow {
    values: HashMap<String, VertexValue>,
}

impl VertexRow {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<VertexValue>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    #[inline]
    pub fn get(&self, field: &str) -> Option<&VertexValue> {
        self.values.get(field)
    }
}

/// One attribute's data laid out contiguously, ready for its own vertex buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeColumn {
    F32(Vec<f32>),
    U32(Vec<u32>),
}

impl AttributeColumn {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            AttributeColumn::F32(v) => v.len(),
            AttributeColumn::U32(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AttributeColumn::F32(v) => bytemuck::cast_slice(v),
            AttributeColumn::U32(v) => bytemuck::cast_slice(v),
        }
    }
}

/// Fixed-capacity sequential writer that refuses to grow.
struct ColumnWriter<'a, T> {
    field: &'a str,
    data: Vec<T>,
    capacity: usize,
}

impl<'a, T: Copy> ColumnWriter<'a, T> {
    fn new(field: &'a str, capacity: usize) -> Self {
        Self {
            field,
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `values`. A write that would run past the end fails without
    /// writing anything and reports `capacity` as the overflow position, the
    /// first slot past the buffer.
    fn write(&mut self, row: usize, values: &[T]) -> Result<(), CompileError> {
        if self.data.len() + values.len() > self.capacity {
            return Err(CompileError::BufferOverflow {
                field: self.field.to_string(),
                row,
                position: self.capacity,
                capacity: self.capacity,
            });
        }
        self.data.extend_from_slice(values);
        Ok(())
    }
}

/// Scatters one attribute out of row-oriented vertex data.
///
/// The column holds exactly `rows * components` values, with row `i`
/// occupying `[i * components, (i + 1) * components)`.
pub fn scatter_column(
    attr: &AttributeDescriptor,
    rows: &[VertexRow],
) -> Result<AttributeColumn, CompileError> {
    let comps = attr.format.components();
    let capacity = rows.len() * comps;
    let field = attr.field.as_str();

    let value_of = |row: usize| {
        rows[row].get(field).ok_or_else(|| CompileError::MissingField {
            field: field.to_string(),
            row,
        })
    };

    let too_short = |row: usize, found: usize| CompileError::ComponentMismatch {
        field: field.to_string(),
        row,
        expected: comps,
        found,
    };

    let wrong_kind = |row: usize| CompileError::ValueKind {
        field: field.to_string(),
        row,
    };

    if attr.format.is_integer() {
        let mut out = ColumnWriter::<u32>::new(field, capacity);
        for row in 0..rows.len() {
            match value_of(row)? {
                VertexValue::U32(v) => out.write(row, std::slice::from_ref(v))?,
                VertexValue::F32(_) | VertexValue::F32s(_) => return Err(wrong_kind(row)),
            }
        }
        return Ok(AttributeColumn::U32(out.data));
    }

    let mut out = ColumnWriter::<f32>::new(field, capacity);
    for row in 0..rows.len() {
        match value_of(row)? {
            VertexValue::F32(v) if comps == 1 => out.write(row, std::slice::from_ref(v))?,
            VertexValue::F32(_) => return Err(too_short(row, 1)),
            VertexValue::F32s(vs) if vs.len() < comps => return Err(too_short(row, vs.len())),
            VertexValue::F32s(vs) => out.write(row, vs)?,
            VertexValue::U32(_) => return Err(wrong_kind(row)),
        }
    }
    Ok(AttributeColumn::F32(out.data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec4_rows(n: usize) -> Vec<VertexRow> {
        (0..n)
            .map(|i| {
                let f = i as f32;
                VertexRow::new()
                    .with("position", [f, f + 0.1, f + 0.2, 1.0])
                    .with("color", [1.0, 0.0, f, 1.0])
            })
            .collect()
    }

    #[test]
    fn parse_known_formats() {
        assert_eq!("float32x3".parse::<AttributeFormat>(), Ok(AttributeFormat::Float32x3));
        assert_eq!("uint32".parse::<AttributeFormat>(), Ok(AttributeFormat::Uint32));
    }

    #[test]
    fn parse_unknown_format_fails() {
        let err = AttributeDescriptor::parse("position", "float16x2").unwrap_err();
        assert_eq!(
            err,
            CompileError::UnsupportedFormat { format: "float16x2".into() }
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn scatter_places_rows_positionally() {
        let rows = vec4_rows(5);
        let attr = AttributeDescriptor::new("position", AttributeFormat::Float32x4);
        let AttributeColumn::F32(col) = scatter_column(&attr, &rows).unwrap() else {
            panic!("expected a float column");
        };
        assert_eq!(col.len(), 5 * 4);
        for (i, row) in rows.iter().enumerate() {
            let Some(VertexValue::F32s(vs)) = row.get("position") else { unreachable!() };
            for (j, v) in vs.iter().enumerate() {
                assert_eq!(col[i * 4 + j], *v);
            }
        }
    }

    #[test]
    fn scalar_rows_fill_scalar_column() {
        let rows: Vec<_> = (0..3).map(|i| VertexRow::new().with("size", i as f32)).collect();
        let attr = AttributeDescriptor::new("size", AttributeFormat::Float32);
        assert_eq!(
            scatter_column(&attr, &rows).unwrap(),
            AttributeColumn::F32(vec![0.0, 1.0, 2.0])
        );
    }

    #[test]
    fn uint_rows_fill_uint_column() {
        let rows: Vec<_> = (0..3u32).map(|i| VertexRow::new().with("id", i * 2)).collect();
        let attr = AttributeDescriptor::new("id", AttributeFormat::Uint32);
        let col = scatter_column(&attr, &rows).unwrap();
        assert_eq!(col, AttributeColumn::U32(vec![0, 2, 4]));
        assert_eq!(col.as_bytes().len(), 12);
    }

    #[test]
    fn oversupplied_row_overflows_with_position() {
        let mut rows = vec4_rows(3);
        rows[0] = VertexRow::new().with("position", vec![0.0, 0.0, 0.0, 1.0, 9.0]);
        let attr = AttributeDescriptor::new("position", AttributeFormat::Float32x4);
        let err = scatter_column(&attr, &rows).unwrap_err();
        assert_eq!(
            err,
            CompileError::BufferOverflow {
                field: "position".into(),
                row: 2,
                position: 12,
                capacity: 12,
            }
        );
        assert!(!err.is_configuration());
    }

    #[test]
    fn oversupplied_last_row_overflows() {
        let mut rows = vec4_rows(2);
        rows[1] = VertexRow::new().with("position", vec![0.0; 6]);
        let attr = AttributeDescriptor::new("position", AttributeFormat::Float32x4);
        assert!(matches!(
            scatter_column(&attr, &rows),
            Err(CompileError::BufferOverflow { row: 1, position: 8, capacity: 8, .. })
        ));
    }

    #[test]
    fn undersupplied_row_is_rejected() {
        let rows = vec![VertexRow::new().with("position", [1.0, 2.0])];
        let attr = AttributeDescriptor::new("position", AttributeFormat::Float32x3);
        assert_eq!(
            scatter_column(&attr, &rows).unwrap_err(),
            CompileError::ComponentMismatch {
                field: "position".into(),
                row: 0,
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn missing_field_is_rejected() {
        let rows = vec4_rows(2);
        let attr = AttributeDescriptor::new("normal", AttributeFormat::Float32x3);
        assert!(matches!(
            scatter_column(&attr, &rows),
            Err(CompileError::MissingField { row: 0, .. })
        ));
    }

    #[test]
    fn float_for_uint_is_rejected() {
        let rows = vec![VertexRow::new().with("id", 1.5f32)];
        let attr = AttributeDescriptor::new("id", AttributeFormat::Uint32);
        assert!(matches!(
            scatter_column(&attr, &rows),
            Err(CompileError::ValueKind { row: 0, .. })
        ));
    }
}
