//! Core data types for shaped OSM records.
//!
//! A [`ShapedRecord`] serializes to one output JSON document. Field order in
//! the structs below is the field order in the output.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::config::CREATED_KEYS;
use crate::xml::RawElement;

/// OSM element types that produce records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A single point.
    Node,

    /// An ordered list of node references.
    Way,
}

impl ElementKind {
    /// Map an XML tag name to a shaped element kind.
    ///
    /// # Returns
    /// `None` for every tag other than `node` and `way`
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "node" => Some(Self::Node),
            "way" => Some(Self::Way),
            _ => None,
        }
    }

    /// Get the tag name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
        }
    }
}

/// Latitude/longitude pair, or nothing when the coordinates were unusable.
///
/// Serializes as `[lat, lon]` or `[]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position(Option<[f64; 2]>);

impl Position {
    /// Position with both coordinates.
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self(Some([lat, lon]))
    }

    /// Position without coordinates.
    #[must_use]
    pub fn empty() -> Self {
        Self(None)
    }

    /// Parse `lat`/`lon` attribute values.
    ///
    /// Returns an empty position when either value is missing, is not a
    /// number, or is not finite.
    ///
    /// # Examples
    /// ```
    /// use osm_cleaner::types::Position;
    ///
    /// assert_eq!(Position::parse(Some("17.5"), Some("78.25")), Position::new(17.5, 78.25));
    /// assert!(Position::parse(Some("17.5"), Some("east")).is_empty());
    /// assert!(Position::parse(None, Some("78.25")).is_empty());
    /// ```
    #[must_use]
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Self {
        match (lat.and_then(parse_coordinate), lon.and_then(parse_coordinate)) {
            (Some(lat), Some(lon)) => Self::new(lat, lon),
            _ => Self::empty(),
        }
    }

    /// Get the coordinates as `[lat, lon]`.
    #[must_use]
    pub fn coordinates(&self) -> Option<[f64; 2]> {
        self.0
    }

    /// Check if the position has no coordinates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

fn parse_coordinate(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|coordinate| coordinate.is_finite())
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let coordinates: &[f64] = match &self.0 {
            Some(pair) => pair.as_slice(),
            None => &[],
        };
        coordinates.serialize(serializer)
    }
}

/// Edit metadata copied from element attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Created {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changeset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl Created {
    /// Collect the edit metadata attributes of an element.
    ///
    /// # Returns
    /// `None` when the element carries none of them
    #[must_use]
    pub fn from_element(element: &RawElement) -> Option<Self> {
        let mut created = Self::default();
        let mut found = false;

        for key in CREATED_KEYS {
            let Some(value) = element.attribute(key) else {
                continue;
            };
            let slot = match key {
                "version" => &mut created.version,
                "changeset" => &mut created.changeset,
                "timestamp" => &mut created.timestamp,
                "user" => &mut created.user,
                "uid" => &mut created.uid,
                _ => continue,
            };
            *slot = Some(value.to_string());
            found = true;
        }

        found.then_some(created)
    }
}

/// Address parts keyed by the suffix after `addr:`.
///
/// Keeps first-insertion order; inserting an existing key replaces its value
/// in place. A tag without a value is kept as a part with no value and
/// serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFields(Vec<(String, Option<String>)>);

impl AddressFields {
    /// Insert or replace a part.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<&str>) {
        let key = key.into();
        let value = value.map(str::to_string);
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Get a part's value by key.
    ///
    /// # Returns
    /// `None` when the part is absent or has no value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Check if a part is present, with or without a value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(existing, _)| existing == key)
    }

    /// Iterate over parts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    /// Number of parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for AddressFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The `address` field of a record.
///
/// An `addr:postcode` tag first stores the cleaned postcode as a bare string;
/// the same tag then replaces it with the full parts mapping, so a finished
/// record only ever holds [`Address::Fields`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Address {
    /// Cleaned postal code.
    Postcode(String),

    /// Address parts by suffix.
    Fields(AddressFields),
}

impl Address {
    /// Get the parts mapping, if this is one.
    #[must_use]
    pub fn fields(&self) -> Option<&AddressFields> {
        match self {
            Self::Fields(fields) => Some(fields),
            Self::Postcode(_) => None,
        }
    }
}

/// One cleaned `node` or `way`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapedRecord {
    pub pos: Position,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub visible: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Created>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub node_refs: Vec<String>,
}

impl ShapedRecord {
    /// Create a record with only its identity set.
    pub fn new(kind: ElementKind, id: impl Into<String>) -> Self {
        Self {
            pos: Position::empty(),
            id: id.into(),
            kind,
            visible: None,
            amenity: None,
            name: None,
            created: None,
            address: None,
            node_refs: Vec::new(),
        }
    }
}
