//! Read-only audit of an OSM document before conversion.
//!
//! Reports how many elements of each kind the document holds, how its tag
//! keys break down by shape, and which street names end in an unexpected
//! street type (usually an abbreviation the name rules should cover).

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;

use crate::config::{
    EXPECTED_STREET_TYPES, LOWER_COLON_KEY, LOWER_KEY, PROBLEM_CHARS, STREET_KEY, STREET_TYPE,
};
use crate::error::Result;
use crate::xml::{ElementReader, RawElement};

/// Shape of a tag key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    /// Lowercase letters and underscores only (`highway`).
    Lower,

    /// Lowercase with a single colon (`addr:city`).
    LowerColon,

    /// Contains a character that cannot appear in a field name.
    #[serde(rename = "problemchars")]
    ProblemChars,

    /// Anything else (`name:TE`, `addr:street:name`).
    Other,
}

impl KeyType {
    /// Classify a tag key.
    ///
    /// # Examples
    /// ```
    /// use osm_cleaner::audit::KeyType;
    ///
    /// assert_eq!(KeyType::of("highway"), KeyType::Lower);
    /// assert_eq!(KeyType::of("addr:city"), KeyType::LowerColon);
    /// assert_eq!(KeyType::of("fixme?"), KeyType::ProblemChars);
    /// assert_eq!(KeyType::of("name:TE"), KeyType::Other);
    /// ```
    #[must_use]
    pub fn of(key: &str) -> Self {
        if LOWER_KEY.is_match(key) {
            Self::Lower
        } else if LOWER_COLON_KEY.is_match(key) {
            Self::LowerColon
        } else if PROBLEM_CHARS.is_match(key) {
            Self::ProblemChars
        } else {
            Self::Other
        }
    }
}

/// Last token of a street name (e.g. `"Rd."` in `"Banjara Hills Rd."`).
///
/// # Examples
/// ```
/// use osm_cleaner::audit::street_type;
///
/// assert_eq!(street_type("Banjara Hills Rd."), Some("Rd."));
/// assert_eq!(street_type(""), None);
/// ```
pub fn street_type(street: &str) -> Option<&str> {
    STREET_TYPE.find(street).map(|m| m.as_str())
}

/// Check if a street type is one of the expected full forms.
pub fn is_expected_street_type(street_type: &str) -> bool {
    EXPECTED_STREET_TYPES.contains(&street_type)
}

/// Summary of an audited document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Number of elements per tag name.
    pub element_counts: BTreeMap<String, usize>,

    /// Number of `tag` keys per key shape.
    pub key_types: BTreeMap<KeyType, usize>,

    /// Street names grouped by their unexpected street type.
    pub unexpected_street_types: BTreeMap<String, BTreeSet<String>>,
}

impl AuditReport {
    /// Account for one element.
    fn record(&mut self, element: &RawElement) {
        *self.element_counts.entry(element.tag.clone()).or_default() += 1;

        if !element.has_tag("tag") {
            return;
        }
        let Some(key) = element.attribute("k") else {
            return;
        };
        *self.key_types.entry(KeyType::of(key)).or_default() += 1;

        if key != STREET_KEY {
            return;
        }
        let Some(street) = element.attribute("v") else {
            return;
        };
        if let Some(kind) = street_type(street).filter(|kind| !is_expected_street_type(kind)) {
            self.unexpected_street_types
                .entry(kind.to_string())
                .or_default()
                .insert(street.to_string());
        }
    }

    /// Total number of elements seen.
    #[must_use]
    pub fn total_elements(&self) -> usize {
        self.element_counts.values().sum()
    }
}

/// Audit a sequence of elements.
pub fn audit_elements<I>(elements: I) -> Result<AuditReport>
where
    I: IntoIterator<Item = Result<RawElement>>,
{
    let mut report = AuditReport::default();
    for element in elements {
        report.record(&element?);
    }

    for (kind, streets) in &report.unexpected_street_types {
        tracing::warn!(street_type = %kind, count = streets.len(), "Unexpected street type");
    }
    Ok(report)
}

/// Audit an OSM XML file.
pub fn audit_file(path: &Path) -> Result<AuditReport> {
    let report = audit_elements(ElementReader::from_path(path)?)?;
    tracing::info!(
        input = %path.display(),
        elements = report.total_elements(),
        "Audit finished"
    );
    Ok(report)
}
