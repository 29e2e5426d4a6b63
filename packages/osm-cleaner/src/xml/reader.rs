//! Incremental element reader built on `quick-xml`.
//!
//! Elements are produced in document order at their end tag, the same order
//! an `end`-event iterparse would give. Only the open ancestors of the current
//! element are held in memory.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::element::RawElement;
use crate::error::{ConverterError, Result};

/// Lazy, forward-only sequence of elements read from an XML source.
///
/// The reader yields every element, nested ones included. Elements nested
/// below the document root are also kept in their parent's `children`, so a
/// `<node>` or `<way>` arrives with its `<tag>` and `<nd>` children. The
/// document root itself does not retain its children.
///
/// After the first error the sequence is exhausted.
///
/// # Examples
/// ```
/// use osm_cleaner::xml::ElementReader;
///
/// let xml = r#"<osm><node id="1"><tag k="amenity" v="cafe"/></node></osm>"#;
/// let tags: Vec<String> = ElementReader::new(xml.as_bytes())
///     .map(|element| element.map(|e| e.tag))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(tags, vec!["tag", "node", "osm"]);
/// ```
pub struct ElementReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    open: Vec<RawElement>,
    seen_root: bool,
    finished: bool,
}

impl ElementReader<BufReader<File>> {
    /// Open an XML file for streaming.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ElementReader<R> {
    /// Stream elements from any buffered source.
    pub fn new(source: R) -> Self {
        Self {
            reader: Reader::from_reader(source),
            buf: Vec::new(),
            open: Vec::new(),
            seen_root: false,
            finished: false,
        }
    }

    /// The document element has been read completely.
    fn root_closed(&self) -> bool {
        self.seen_root && self.open.is_empty()
    }

    /// Read events until the next element closes.
    fn next_element(&mut self) -> Result<Option<RawElement>> {
        loop {
            let after_root = self.root_closed();
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(start) => {
                    let element = open_element(&self.reader, &start)?;
                    reject_after_root(after_root, &element.tag)?;
                    self.seen_root = true;
                    self.open.push(element);
                }
                Event::Empty(start) => {
                    let element = open_element(&self.reader, &start)?;
                    reject_after_root(after_root, &element.tag)?;
                    self.seen_root = true;
                    return Ok(Some(close_element(&mut self.open, element)));
                }
                Event::Text(text) if after_root => {
                    if !text.iter().all(u8::is_ascii_whitespace) {
                        return Err(ConverterError::JunkAfterRoot {
                            found: "text".to_string(),
                        });
                    }
                }
                Event::CData(_) if after_root => {
                    return Err(ConverterError::JunkAfterRoot {
                        found: "CDATA".to_string(),
                    });
                }
                Event::End(_) => {
                    // End names are checked against the open tag by quick-xml
                    if let Some(element) = self.open.pop() {
                        return Ok(Some(close_element(&mut self.open, element)));
                    }
                }
                Event::Eof => {
                    if let Some(element) = self.open.last() {
                        return Err(ConverterError::UnexpectedEof {
                            open: element.tag.clone(),
                        });
                    }
                    if !self.seen_root {
                        return Err(ConverterError::EmptyDocument);
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for ElementReader<R> {
    type Item = Result<RawElement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let next = self.next_element().transpose();
        if !matches!(next, Some(Ok(_))) {
            self.finished = true;
        }
        next
    }
}

/// Reject a second top-level element.
fn reject_after_root(after_root: bool, tag: &str) -> Result<()> {
    if after_root {
        return Err(ConverterError::JunkAfterRoot {
            found: format!("<{tag}>"),
        });
    }
    Ok(())
}

/// Build an owned element from a start (or empty) tag.
fn open_element<R>(reader: &Reader<R>, start: &BytesStart<'_>) -> Result<RawElement> {
    let decoder = reader.decoder();
    let tag = decoder.decode(start.local_name().as_ref())?.into_owned();

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let name = decoder.decode(attribute.key.as_ref())?.into_owned();
        let value = attribute.decode_and_unescape_value(reader)?.into_owned();
        attributes.push((name, value));
    }

    Ok(RawElement {
        tag,
        attributes,
        children: Vec::new(),
    })
}

/// Finish an element, attaching a copy to its parent unless the parent is the
/// document root.
fn close_element(open: &mut [RawElement], element: RawElement) -> RawElement {
    if open.len() > 1 {
        if let Some(parent) = open.last_mut() {
            parent.children.push(element.clone());
        }
    }
    element
}
