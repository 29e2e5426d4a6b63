//! Streaming access to OSM XML documents.

mod element;
mod reader;

pub use element::RawElement;
pub use reader::ElementReader;
