//! Conversion driver that ties reader, shaper and writer together.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::OUTPUT_EXTENSION;
use crate::error::Result;
use crate::json::{write_records, JsonFormat};
use crate::shape::shape_element;
use crate::types::ShapedRecord;
use crate::xml::ElementReader;

/// Output path for an input file: the input path with `.json` appended.
///
/// # Examples
/// ```
/// use std::path::{Path, PathBuf};
/// use osm_cleaner::converter::output_path;
///
/// assert_eq!(
///     output_path(Path::new("data/hyderabad_india.osm")),
///     PathBuf::from("data/hyderabad_india.osm.json")
/// );
/// ```
pub fn output_path(input: &Path) -> PathBuf {
    let mut path = OsString::from(input.as_os_str());
    path.push(".");
    path.push(OUTPUT_EXTENSION);
    PathBuf::from(path)
}

/// Convert an OSM XML file into `<input>.json`.
///
/// # Arguments
/// * `input` - Path to the OSM XML document
/// * `format` - Pretty or compact output documents
///
/// # Returns
/// All shaped records in document order
pub fn process_map(input: &Path, format: JsonFormat) -> Result<Vec<ShapedRecord>> {
    process_map_to(input, &output_path(input), format)
}

/// Convert an OSM XML file into the given output file.
///
/// The output file is created (or truncated) before reading starts and stays
/// open until the run ends. On error it may hold a partial result.
pub fn process_map_to(input: &Path, output: &Path, format: JsonFormat) -> Result<Vec<ShapedRecord>> {
    let reader = ElementReader::from_path(input)?;
    let file = File::create(output)?;

    let data = convert(reader, BufWriter::new(file), format)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        records = data.len(),
        "Conversion finished"
    );
    Ok(data)
}

/// Convert elements from any XML source into any sink.
///
/// # Examples
/// ```
/// use osm_cleaner::converter::convert;
/// use osm_cleaner::json::JsonFormat;
/// use osm_cleaner::xml::ElementReader;
///
/// let xml = r#"<osm><node id="1" lat="1.5" lon="2.5"/><relation id="9"/></osm>"#;
/// let mut out = Vec::new();
/// let data = convert(ElementReader::new(xml.as_bytes()), &mut out, JsonFormat::Compact).unwrap();
///
/// assert_eq!(data.len(), 1);
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "{\"pos\":[1.5,2.5],\"id\":\"1\",\"type\":\"node\",\"visible\":null}\n"
/// );
/// ```
pub fn convert<R, W>(elements: ElementReader<R>, writer: W, format: JsonFormat) -> Result<Vec<ShapedRecord>>
where
    R: BufRead,
    W: Write,
{
    let records = elements.filter_map(|element| match element {
        Ok(element) => shape_element(&element).transpose(),
        Err(e) => Some(Err(e)),
    });
    write_records(writer, records, format)
}
