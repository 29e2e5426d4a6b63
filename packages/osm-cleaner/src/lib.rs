//! OSM cleaner - Convert OpenStreetMap XML exports into cleaned JSON.
//!
//! This crate streams an OSM XML document, shapes every `node` and `way`
//! into a record with normalized address, amenity and name fields, and
//! writes one JSON document per record for loading into a document store.
//!
//! # Example
//!
//! ```
//! use osm_cleaner::clean::{clean_amenity, update_postalcode};
//!
//! assert_eq!(clean_amenity("fast_food"), "fast food");
//! assert_eq!(update_postalcode("500 081"), "500081");
//! ```
//!
//! # Architecture
//!
//! The converter is organized into several modules:
//!
//! - [`config`]: Fixed tables, patterns and name rules
//! - [`types`]: Output record types (ShapedRecord, Address, Position, etc.)
//! - [`error`]: Error types and Result alias
//! - [`xml`]: Streaming element reader
//! - [`clean`]: Value cleaning (names, amenities, postal codes)
//! - [`shape`]: Element-to-record shaping
//! - [`json`]: JSON output generation
//! - [`converter`]: Reader-shaper-writer driver
//! - [`audit`]: Pre-conversion data audit
//! - [`cli`]: Command-line interface

pub mod audit;
pub mod clean;
pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod json;
pub mod shape;
pub mod types;
pub mod xml;

// Re-export main functions
pub use converter::{process_map, process_map_to};
pub use shape::shape_element;

// Re-export commonly used items
pub use error::{ConverterError, Result};
pub use json::JsonFormat;
pub use types::{Address, ElementKind, Position, ShapedRecord};
