use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::codec::read_field;
use crate::schema::{self, ELAPSE, ELAPSED_FIELD, TERMINATOR};
use crate::types::DecodeError;

/// A record that was decoded and forwarded.
///
/// Field values are not kept once forwarded, except for the elapsed-time
/// clock of [`ELAPSE`] records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub tag: u8,
    /// Elapsed time in milliseconds, for `ELAPSE` records only.
    pub elapsed: Option<i32>,
    /// Number of bytes forwarded for this record, tag included.
    pub len: usize,
}

/// The result of reading one record from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Decoded(Record),
    /// The terminator tag was read (and forwarded).
    Terminator,
    /// The source was exhausted at a record boundary.
    EndOfStream,
}

/// Read one record from `source`, forwarding every byte consumed to `sink`.
///
/// The tag byte is forwarded before it is validated, and each field is
/// forwarded as soon as it has been read, so the sink always sees exactly
/// the bytes consumed from the source, even when the record is truncated.
pub async fn read_record<R, W>(source: &mut R, sink: &mut W) -> Result<RecordOutcome, DecodeError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    // EOF before the tag byte means there are no more records.
    let mut tag_byte = [0u8; 1];
    match source.read_exact(&mut tag_byte).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Ok(RecordOutcome::EndOfStream);
        }
        Err(e) => return Err(DecodeError::Io(e)),
    }
    sink.write_all(&tag_byte).await.map_err(DecodeError::Sink)?;

    let tag = tag_byte[0];
    let fields = schema::field_spec(tag).ok_or(DecodeError::UnrecognizedTag(tag))?;
    if tag == TERMINATOR {
        return Ok(RecordOutcome::Terminator);
    }

    let mut elapsed = None;
    for (idx, ty) in fields.iter().enumerate() {
        let field = match read_field(source, *ty).await {
            Ok(field) => field,
            Err(err) => {
                // Bytes consumed before a truncation still reach the sink.
                if let DecodeError::TruncatedRecord { partial, .. } = &err {
                    sink.write_all(partial).await.map_err(DecodeError::Sink)?;
                }
                return Err(err);
            }
        };
        sink.write_all(field.raw()).await.map_err(DecodeError::Sink)?;
        if tag == ELAPSE && idx == ELAPSED_FIELD {
            elapsed = field.value.as_i32();
        }
    }

    Ok(RecordOutcome::Decoded(Record {
        tag,
        elapsed,
        len: 1 + schema::body_size(fields),
    }))
}
