//! Error types for the converter.
//!
//! A single `ConverterError` covers every fatal condition of a run. Recoverable
//! conditions (unparsable coordinates, rejected tag keys) never surface here;
//! they are handled where they occur and logged.

use thiserror::Error;

/// Main error type for the converter library.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// IO error while reading the input or writing the output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    Xml(#[from] quick_xml::Error),

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A required attribute is missing from an element.
    #[error("Missing required attribute '{attribute}' on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    /// The document ended before an open element was closed.
    #[error("XML document ended inside <{open}>")]
    UnexpectedEof { open: String },

    /// Content follows the closed document element.
    #[error("XML document has {found} after the document element")]
    JunkAfterRoot { found: String },

    /// The document contains no root element.
    #[error("XML document contains no elements")]
    EmptyDocument,

    /// A street-name rule could not be compiled.
    #[error("Invalid name rule '{abbreviation}': {source}")]
    InvalidNameRule {
        abbreviation: String,
        #[source]
        source: regex::Error,
    },
}

impl ConverterError {
    /// Create a missing-attribute error for an element.
    pub fn missing_attribute(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }
}

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, ConverterError>;
