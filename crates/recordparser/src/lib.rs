//! Record parser for BVE input recordings.
//!
//! This crate decodes the tagged binary stream captured from a live BVE
//! input session, forwarding every byte it consumes to a sink so the stream
//! can be replayed into a fresh simulator instance unchanged.
//!
//! # Protocol
//!
//! A recording is a sequence of records followed by an untagged trailing
//! region. Each record is a single tag byte followed by a fixed set of
//! little-endian fields:
//!
//! | Tag                | Fields                                  |
//! |--------------------|-----------------------------------------|
//! | `0x00`             | u8, u8, u8                              |
//! | `0x01`             | none (end of records)                   |
//! | `0x10`             | i32 ×5                                  |
//! | `0x20`             | i32                                     |
//! | `0x30`             | f64, f32, i32 (elapsed ms), f32 ×6      |
//! | `0x40`-`0x42`      | i32                                     |
//! | `0x50`, `0x51`     | i32                                     |
//! | `0x60`, `0x61`     | i32                                     |
//! | `0x70`, `0x71`     | none                                    |
//! | `0x80`             | i32                                     |
//! | `0x90`             | i32, i32, f32, i32                      |
//! | `0xA0`, `0xA1`     | u8, i32                                 |
//!
//! # Usage
//!
//! ```no_run
//! use bve_recordparser::{read_record, RecordOutcome};
//!
//! # async fn demo() -> Result<(), bve_recordparser::DecodeError> {
//! let data: &[u8] = &[/* recording bytes */];
//! let mut source = data;
//! let mut sink = Vec::new();
//!
//! loop {
//!     match read_record(&mut source, &mut sink).await? {
//!         RecordOutcome::Decoded(record) => println!("{:?}", record),
//!         RecordOutcome::Terminator | RecordOutcome::EndOfStream => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod codec;
mod reader;
pub mod schema;
pub mod types;

pub use codec::{read_field, Field};
pub use reader::{read_record, Record, RecordOutcome};
pub use types::{DecodeError, FieldType, FieldValue};
