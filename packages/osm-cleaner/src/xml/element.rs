//! Owned XML element produced by the streaming reader.

use crate::error::{ConverterError, Result};

/// An XML element with its attributes and (nested) child elements.
///
/// Attributes keep their document order. Text content is not retained since
/// OSM data carries everything in attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawElement {
    /// Tag name without namespace prefix (e.g. "node").
    pub tag: String,

    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,

    /// Child elements in document order.
    pub children: Vec<RawElement>,
}

impl RawElement {
    /// Create an element without attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter.
    ///
    /// # Examples
    /// ```
    /// use osm_cleaner::xml::RawElement;
    ///
    /// let nd = RawElement::new("nd").with_attribute("ref", "42");
    /// assert_eq!(nd.attribute("ref"), Some("42"));
    /// ```
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder-style child setter.
    #[must_use]
    pub fn with_child(mut self, child: RawElement) -> Self {
        self.children.push(child);
        self
    }

    /// Get an attribute value.
    ///
    /// # Returns
    /// Attribute value, or `None` if not present
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Get an attribute value that must be present.
    ///
    /// # Returns
    /// * `Ok(value)` if present
    /// * `Err(ConverterError::MissingAttribute)` otherwise
    pub fn require_attribute(&self, name: &str) -> Result<&str> {
        self.attribute(name)
            .ok_or_else(|| ConverterError::missing_attribute(&self.tag, name))
    }

    /// Check if the element has a specific tag name.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Iterate over direct children with the given tag name.
    ///
    /// # Examples
    /// ```
    /// use osm_cleaner::xml::RawElement;
    ///
    /// let way = RawElement::new("way")
    ///     .with_child(RawElement::new("nd"))
    ///     .with_child(RawElement::new("tag"))
    ///     .with_child(RawElement::new("nd"));
    /// assert_eq!(way.children_named("nd").count(), 2);
    /// ```
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a RawElement> {
        self.children.iter().filter(move |child| child.has_tag(tag))
    }
}
