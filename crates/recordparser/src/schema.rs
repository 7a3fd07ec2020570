//! The tag table: which fields follow each recognized tag byte.

use crate::types::FieldType::{self, F32, F64, I32, U8};

/// Marks the end of the structured records.
pub const TERMINATOR: u8 = 0x01;

/// Per-frame state update. Carries the elapsed-time clock used for pacing.
pub const ELAPSE: u8 = 0x30;

/// Position of the elapsed-time (ms) field within an [`ELAPSE`] record.
pub const ELAPSED_FIELD: usize = 2;

/// Every recognized tag and the ordered fields that follow it.
pub static TAG_SCHEMA: &[(u8, &[FieldType])] = &[
    (0x00, &[U8, U8, U8]),
    (TERMINATOR, &[]),
    (0x10, &[I32, I32, I32, I32, I32]),
    (0x20, &[I32]),
    (ELAPSE, &[F64, F32, I32, F32, F32, F32, F32, F32, F32]),
    (0x40, &[I32]),
    (0x41, &[I32]),
    (0x42, &[I32]),
    (0x50, &[I32]),
    (0x51, &[I32]),
    (0x60, &[I32]),
    (0x61, &[I32]),
    (0x70, &[]),
    (0x71, &[]),
    (0x80, &[I32]),
    (0x90, &[I32, I32, F32, I32]),
    (0xA0, &[U8, I32]),
    (0xA1, &[U8, I32]),
];

/// Looks up the fields that follow `tag`, or `None` if the tag is not recognized.
pub fn field_spec(tag: u8) -> Option<&'static [FieldType]> {
    TAG_SCHEMA
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, fields)| *fields)
}

/// Size in bytes of the fields following a tag.
pub fn body_size(fields: &[FieldType]) -> usize {
    fields.iter().map(|f| f.size()).sum()
}
