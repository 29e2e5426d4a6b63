//! JSON output generation for shaped records.

mod writer;

pub use writer::{write_records, JsonFormat, RecordWriter};
