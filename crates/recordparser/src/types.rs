#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("unrecognized tag: 0x{0:02x}")]
    UnrecognizedTag(u8),

    /// The source ended in the middle of a record.
    ///
    /// `partial` holds the bytes of the field that were read before the end.
    #[error("truncated record: source ended {} bytes into {field:?} field", partial.len())]
    TruncatedRecord { field: FieldType, partial: Vec<u8> },

    /// Reading the source failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing consumed bytes to the sink failed.
    #[error("could not forward to sink: {0}")]
    Sink(#[source] std::io::Error),
}

/// The fixed-width primitive types a record field can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    U8,
    I32,
    F32,
    F64,
}

impl FieldType {
    /// Encoded size of the field in bytes.
    pub const fn size(self) -> usize {
        match self {
            FieldType::U8 => 1,
            FieldType::I32 | FieldType::F32 => 4,
            FieldType::F64 => 8,
        }
    }
}

/// A decoded field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    U8(u8),
    I32(i32),
    F32(f32),
    F64(f64),
}

impl FieldValue {
    /// Decodes a little-endian value of the given type.
    ///
    /// `raw` must hold exactly `ty.size()` bytes.
    pub(crate) fn decode(ty: FieldType, raw: &[u8]) -> Self {
        match ty {
            FieldType::U8 => FieldValue::U8(raw[0]),
            FieldType::I32 => FieldValue::I32(i32::from_le_bytes(le_array(raw))),
            FieldType::F32 => FieldValue::F32(f32::from_le_bytes(le_array(raw))),
            FieldType::F64 => FieldValue::F64(f64::from_le_bytes(le_array(raw))),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            FieldValue::I32(v) => Some(*v),
            _ => None,
        }
    }
}

fn le_array<const N: usize>(raw: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(&raw[..N]);
    buf
}
