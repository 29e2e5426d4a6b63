//! Line-delimited JSON writer for shaped records.

use std::io::Write;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::config::JSON_INDENT;
use crate::error::Result;
use crate::types::ShapedRecord;

/// Layout of each output document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Indented, one document spread over several lines.
    #[default]
    Pretty,

    /// Minified, one document per line.
    Compact,
}

/// Writes records as consecutive JSON documents, each followed by a newline.
pub struct RecordWriter<W: Write> {
    writer: W,
    format: JsonFormat,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Create a writer over any byte sink.
    pub fn new(writer: W, format: JsonFormat) -> Self {
        Self {
            writer,
            format,
            written: 0,
        }
    }

    /// Write one record.
    pub fn write_record(&mut self, record: &ShapedRecord) -> Result<()> {
        match self.format {
            JsonFormat::Pretty => {
                let formatter = PrettyFormatter::with_indent(JSON_INDENT);
                let mut serializer = Serializer::with_formatter(&mut self.writer, formatter);
                record.serialize(&mut serializer)?;
            }
            JsonFormat::Compact => serde_json::to_writer(&mut self.writer, record)?,
        }
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the underlying sink.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Write every record and collect them in input order.
///
/// Stops at the first error from either the record source or the sink.
///
/// # Examples
/// ```
/// use osm_cleaner::json::{write_records, JsonFormat};
/// use osm_cleaner::types::{ElementKind, ShapedRecord};
///
/// let records = vec![Ok(ShapedRecord::new(ElementKind::Node, "1"))];
/// let mut out = Vec::new();
/// let kept = write_records(&mut out, records, JsonFormat::Compact).unwrap();
///
/// assert_eq!(kept.len(), 1);
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "{\"pos\":[],\"id\":\"1\",\"type\":\"node\",\"visible\":null}\n"
/// );
/// ```
pub fn write_records<W, I>(writer: W, records: I, format: JsonFormat) -> Result<Vec<ShapedRecord>>
where
    W: Write,
    I: IntoIterator<Item = Result<ShapedRecord>>,
{
    let mut out = RecordWriter::new(writer, format);
    let mut data = Vec::new();

    for record in records {
        let record = record?;
        out.write_record(&record)?;
        data.push(record);
    }

    out.finish()?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConverterError;
    use crate::types::{ElementKind, Position};

    fn create_test_record(id: &str) -> ShapedRecord {
        let mut record = ShapedRecord::new(ElementKind::Node, id);
        record.pos = Position::new(17.5, 78.25);
        record.name = Some("Charminar".to_string());
        record
    }

    #[test]
    fn test_compact_one_line_per_record() {
        let mut out = Vec::new();
        let mut writer = RecordWriter::new(&mut out, JsonFormat::Compact);
        writer.write_record(&create_test_record("1")).unwrap();
        writer.write_record(&create_test_record("2")).unwrap();
        assert_eq!(writer.written(), 2);
        writer.finish().unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"pos":[17.5,78.25],"id":"1","type":"node","visible":null,"name":"Charminar"}"#
        );
        assert!(lines[1].contains(r#""id":"2""#));
    }

    #[test]
    fn test_pretty_uses_two_space_indent() {
        let mut out = Vec::new();
        let mut writer = RecordWriter::new(&mut out, JsonFormat::Pretty);
        writer.write_record(&create_test_record("1")).unwrap();
        writer.finish().unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("{\n  \"pos\": [\n    17.5,\n    78.25\n  ],\n  \"id\": \"1\""));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_non_ascii_written_as_utf8() {
        let mut record = create_test_record("1");
        record.name = Some("చార్మినార్".to_string());

        let mut out = Vec::new();
        write_records(&mut out, vec![Ok(record)], JsonFormat::Compact).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("చార్మినార్"));
    }

    #[test]
    fn test_write_records_keeps_order() {
        let records = ["3", "1", "2"].map(|id| Ok(create_test_record(id)));
        let mut out = Vec::new();
        let data = write_records(&mut out, records, JsonFormat::Compact).unwrap();

        let ids: Vec<&str> = data.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_write_records_stops_at_error() {
        let records = vec![
            Ok(create_test_record("1")),
            Err(ConverterError::EmptyDocument),
            Ok(create_test_record("2")),
        ];
        let mut out = Vec::new();
        let result = write_records(&mut out, records, JsonFormat::Compact);

        assert!(matches!(result, Err(ConverterError::EmptyDocument)));
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
