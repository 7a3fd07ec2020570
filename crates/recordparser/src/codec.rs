use tokio::io::{AsyncRead, AsyncReadExt};

use crate::types::{DecodeError, FieldType, FieldValue};

const MAX_FIELD_SIZE: usize = 8;

/// A decoded field together with the exact bytes it was decoded from.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub value: FieldValue,
    raw: [u8; MAX_FIELD_SIZE],
    len: usize,
}

impl Field {
    /// The bytes consumed from the source, in source order.
    pub fn raw(&self) -> &[u8] {
        &self.raw[..self.len]
    }
}

/// Read a single fixed-width field of type `ty` from the source.
///
/// Returns `DecodeError::TruncatedRecord` if the source ends before the
/// whole field could be read. The error carries the bytes that were read
/// before the end, so they can still be forwarded.
pub async fn read_field<R>(source: &mut R, ty: FieldType) -> Result<Field, DecodeError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let len = ty.size();
    let mut raw = [0u8; MAX_FIELD_SIZE];
    let mut filled = 0;
    while filled < len {
        match source.read(&mut raw[filled..len]).await {
            Ok(0) => {
                return Err(DecodeError::TruncatedRecord {
                    field: ty,
                    partial: raw[..filled].to_vec(),
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(DecodeError::Io(e)),
        }
    }

    Ok(Field {
        value: FieldValue::decode(ty, &raw[..len]),
        raw,
        len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_read_u8() {
        let mut src: &[u8] = &[0x42, 0xFF];
        let f = read_field(&mut src, FieldType::U8).await.unwrap();
        assert_eq!(f.value, FieldValue::U8(0x42));
        assert_eq!(f.raw(), &[0x42]);
        assert_eq!(src, &[0xFF]);
    }

    #[tokio::test]
    async fn test_read_i32() {
        let data = (-123456i32).to_le_bytes();
        let mut src: &[u8] = &data;
        let f = read_field(&mut src, FieldType::I32).await.unwrap();
        assert_eq!(f.value, FieldValue::I32(-123456));
        assert_eq!(f.value.as_i32(), Some(-123456));
        assert_eq!(f.raw(), &data);
    }

    #[tokio::test]
    async fn test_read_f32() {
        let data = 3.14f32.to_le_bytes();
        let mut src: &[u8] = &data;
        let f = read_field(&mut src, FieldType::F32).await.unwrap();
        match f.value {
            FieldValue::F32(v) => assert!((v - 3.14).abs() < 0.001),
            other => panic!("expected F32, got {:?}", other),
        }
        assert_eq!(f.value.as_i32(), None);
    }

    #[tokio::test]
    async fn test_read_f64() {
        let data = 1234.5678f64.to_le_bytes();
        let mut src: &[u8] = &data;
        let f = read_field(&mut src, FieldType::F64).await.unwrap();
        assert_eq!(f.value, FieldValue::F64(1234.5678));
        assert_eq!(f.raw().len(), 8);
    }

    #[tokio::test]
    async fn test_read_nan_keeps_raw_bytes() {
        // A NaN payload must come through byte-for-byte even though it
        // doesn't compare equal to itself.
        let data = [0x01, 0x00, 0xC0, 0x7F];
        let mut src: &[u8] = &data;
        let f = read_field(&mut src, FieldType::F32).await.unwrap();
        assert_eq!(f.raw(), &data);
    }

    #[tokio::test]
    async fn test_truncated_field() {
        let mut src: &[u8] = &[0x01, 0x02];
        let result = read_field(&mut src, FieldType::I32).await;
        assert_matches!(
            result,
            Err(DecodeError::TruncatedRecord { field: FieldType::I32, partial }) if partial == [0x01, 0x02]
        );
        assert!(src.is_empty());
    }

    #[tokio::test]
    async fn test_read_across_short_reads() {
        // The chain boundary splits the field over two reads.
        let data = 0x0102_0304i32.to_le_bytes();
        let mut src = (&data[..1]).chain(&data[1..]);
        let f = read_field(&mut src, FieldType::I32).await.unwrap();
        assert_eq!(f.value, FieldValue::I32(0x0102_0304));
        assert_eq!(f.raw(), &data);
    }

    #[tokio::test]
    async fn test_empty_source() {
        let mut src: &[u8] = &[];
        let result = read_field(&mut src, FieldType::U8).await;
        assert_matches!(
            result,
            Err(DecodeError::TruncatedRecord { field: FieldType::U8, partial }) if partial.is_empty()
        );
    }
}
