//! Shaping of raw OSM elements into output records.

use crate::clean::{clean_amenity, update_name, update_postalcode};
use crate::config::{ADDRESS_PREFIX, COMPOUND_KEY, NAME_RULES, POSTCODE_KEY, PROBLEM_CHARS};
use crate::error::Result;
use crate::types::{Address, AddressFields, Created, ElementKind, Position, ShapedRecord};
use crate::xml::RawElement;

/// How a `tag` key is treated when building the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKey<'a> {
    /// Key contains a character that cannot appear in a field name.
    Problem,

    /// Key has three or more colon-separated parts.
    Compound,

    /// `addr:` key; holds the suffix after the prefix.
    Address(&'a str),

    /// Any other key.
    Other,
}

impl<'a> TagKey<'a> {
    /// Classify a tag key.
    ///
    /// # Examples
    /// ```
    /// use osm_cleaner::shape::TagKey;
    ///
    /// assert_eq!(TagKey::classify("addr:city"), TagKey::Address("city"));
    /// assert_eq!(TagKey::classify("addr:street:name"), TagKey::Compound);
    /// assert_eq!(TagKey::classify("addr city"), TagKey::Problem);
    /// assert_eq!(TagKey::classify("highway"), TagKey::Other);
    /// ```
    #[must_use]
    pub fn classify(key: &'a str) -> Self {
        if PROBLEM_CHARS.is_match(key) {
            Self::Problem
        } else if COMPOUND_KEY.is_match(key) {
            Self::Compound
        } else if let Some(suffix) = key.strip_prefix(ADDRESS_PREFIX) {
            Self::Address(suffix)
        } else {
            Self::Other
        }
    }
}

/// Shape an element into a record.
///
/// # Returns
/// * `Ok(Some(record))` for `node` and `way` elements
/// * `Ok(None)` for every other element
/// * `Err(ConverterError::MissingAttribute)` when a `node`/`way` lacks `id`,
///   a `tag` child lacks `k`, an `nd` child lacks `ref`, or an `amenity`,
///   `name` or `addr:postcode` tag lacks `v`
///
/// Any other `addr:` tag without `v` becomes a part with no value.
///
/// Unusable coordinates never fail the element; the record gets an empty
/// `pos` instead.
///
/// # Examples
/// ```
/// use osm_cleaner::shape::shape_element;
/// use osm_cleaner::xml::RawElement;
///
/// let node = RawElement::new("node")
///     .with_attribute("id", "1")
///     .with_attribute("lat", "17.4")
///     .with_attribute("lon", "78.5");
/// let record = shape_element(&node).unwrap().unwrap();
/// assert_eq!(record.pos.coordinates(), Some([17.4, 78.5]));
///
/// assert!(shape_element(&RawElement::new("relation")).unwrap().is_none());
/// ```
pub fn shape_element(element: &RawElement) -> Result<Option<ShapedRecord>> {
    let Some(kind) = ElementKind::from_tag(&element.tag) else {
        return Ok(None);
    };

    let id = element.require_attribute("id")?;
    let mut record = ShapedRecord::new(kind, id);

    record.pos = Position::parse(element.attribute("lat"), element.attribute("lon"));
    if record.pos.is_empty() {
        tracing::debug!(id, kind = kind.as_str(), "Unusable coordinates, leaving pos empty");
    }
    record.visible = element.attribute("visible").map(str::to_string);

    apply_descriptive_tags(element, &mut record)?;
    record.created = Created::from_element(element);
    apply_children(element, &mut record)?;

    Ok(Some(record))
}

/// Set `amenity` and `name` from the element's tags.
fn apply_descriptive_tags(element: &RawElement, record: &mut ShapedRecord) -> Result<()> {
    for tag in element.children_named("tag") {
        match tag.require_attribute("k")? {
            "amenity" => {
                record.amenity = Some(clean_amenity(tag.require_attribute("v")?));
            }
            "name" => {
                let value = tag.require_attribute("v")?;
                if value.chars().count() > 1 {
                    record.name = Some(update_name(value, &NAME_RULES));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Build `address` and `node_refs` from the element's children, in order.
fn apply_children(element: &RawElement, record: &mut ShapedRecord) -> Result<()> {
    let mut address = AddressFields::default();

    for child in &element.children {
        match child.tag.as_str() {
            "tag" => {
                let key = child.require_attribute("k")?;
                let suffix = match TagKey::classify(key) {
                    TagKey::Address(suffix) => suffix,
                    TagKey::Problem | TagKey::Compound => {
                        tracing::debug!(id = %record.id, key, "Skipping tag key");
                        continue;
                    }
                    TagKey::Other => continue,
                };

                let value = child.attribute("v");
                if key == POSTCODE_KEY {
                    let postcode = child.require_attribute("v")?;
                    record.address = Some(Address::Postcode(update_postalcode(postcode)));
                }
                address.insert(suffix, value);
                record.address = Some(Address::Fields(address.clone()));
            }
            "nd" => record.node_refs.push(child.require_attribute("ref")?.to_string()),
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConverterError;
    use serde_json::json;

    fn tag(key: &str, value: &str) -> RawElement {
        RawElement::new("tag")
            .with_attribute("k", key)
            .with_attribute("v", value)
    }

    fn nd(reference: &str) -> RawElement {
        RawElement::new("nd").with_attribute("ref", reference)
    }

    fn node(id: &str) -> RawElement {
        RawElement::new("node")
            .with_attribute("id", id)
            .with_attribute("lat", "17.3850")
            .with_attribute("lon", "78.4867")
    }

    fn shape(element: &RawElement) -> ShapedRecord {
        shape_element(element).unwrap().unwrap()
    }

    #[test]
    fn test_other_elements_are_skipped() {
        for name in ["relation", "tag", "nd", "member", "osm", "bounds"] {
            let element = RawElement::new(name).with_attribute("id", "1");
            assert!(shape_element(&element).unwrap().is_none(), "{name}");
        }
    }

    #[test]
    fn test_skipped_elements_need_no_attributes() {
        assert!(shape_element(&RawElement::new("relation")).unwrap().is_none());
    }

    #[test]
    fn test_basic_node() {
        let element = node("1").with_attribute("visible", "true");
        let record = shape(&element);

        assert_eq!(record.id, "1");
        assert_eq!(record.kind, ElementKind::Node);
        assert_eq!(record.pos.coordinates(), Some([17.385, 78.4867]));
        assert_eq!(record.visible.as_deref(), Some("true"));
        assert!(record.created.is_none());
        assert!(record.address.is_none());
        assert!(record.node_refs.is_empty());
    }

    #[test]
    fn test_bad_coordinates_degrade_to_empty_pos() {
        let element = RawElement::new("node")
            .with_attribute("id", "2")
            .with_attribute("lat", "north")
            .with_attribute("lon", "78.4");
        let record = shape(&element);
        assert!(record.pos.is_empty());

        let way = RawElement::new("way").with_attribute("id", "3");
        assert!(shape(&way).pos.is_empty());
    }

    #[test]
    fn test_missing_id_is_fatal() {
        let element = RawElement::new("node").with_attribute("lat", "1.0");
        let err = shape_element(&element).unwrap_err();
        assert!(matches!(err, ConverterError::MissingAttribute { .. }));
    }

    #[test]
    fn test_address_tag_without_value_is_null() {
        let element = node("1")
            .with_child(RawElement::new("tag").with_attribute("k", "addr:city"))
            .with_child(tag("addr:street", "MG Road"));
        let record = shape(&element);

        assert_eq!(
            serde_json::to_value(&record.address).unwrap(),
            json!({"city": null, "street": "MG Road"})
        );
    }

    #[test]
    fn test_postcode_without_value_is_fatal() {
        let element =
            node("1").with_child(RawElement::new("tag").with_attribute("k", "addr:postcode"));
        let err = shape_element(&element).unwrap_err();
        assert!(matches!(
            err,
            ConverterError::MissingAttribute { ref attribute, .. } if attribute == "v"
        ));
    }

    #[test]
    fn test_missing_tag_key_is_fatal() {
        let element = node("1").with_child(RawElement::new("tag").with_attribute("v", "x"));
        assert!(shape_element(&element).is_err());
    }

    #[test]
    fn test_amenity_and_name() {
        let element = node("1")
            .with_child(tag("amenity", "fast_food"))
            .with_child(tag("name", "Paradise Rd"));
        let record = shape(&element);

        assert_eq!(record.amenity.as_deref(), Some("fast food"));
        assert_eq!(record.name.as_deref(), Some("Paradise Road"));
    }

    #[test]
    fn test_single_character_name_is_dropped() {
        let element = node("1").with_child(tag("name", "A"));
        assert!(shape(&element).name.is_none());

        // Length counts characters, not bytes
        let element = node("1").with_child(tag("name", "ఆ"));
        assert!(shape(&element).name.is_none());
    }

    #[test]
    fn test_created_attributes() {
        let element = node("1")
            .with_attribute("version", "2")
            .with_attribute("changeset", "100")
            .with_attribute("timestamp", "2016-01-01T00:00:00Z")
            .with_attribute("user", "mapper")
            .with_attribute("uid", "7");
        let created = shape(&element).created.unwrap();

        assert_eq!(created.version.as_deref(), Some("2"));
        assert_eq!(created.changeset.as_deref(), Some("100"));
        assert_eq!(created.timestamp.as_deref(), Some("2016-01-01T00:00:00Z"));
        assert_eq!(created.user.as_deref(), Some("mapper"));
        assert_eq!(created.uid.as_deref(), Some("7"));
    }

    #[test]
    fn test_way_node_refs_in_order() {
        let element = RawElement::new("way")
            .with_attribute("id", "10")
            .with_child(nd("1"))
            .with_child(nd("2"))
            .with_child(tag("highway", "residential"))
            .with_child(nd("3"));
        let record = shape(&element);

        assert_eq!(record.kind, ElementKind::Way);
        assert_eq!(record.node_refs, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_address_parts() {
        let element = node("1")
            .with_child(tag("addr:housenumber", "8-2-293"))
            .with_child(tag("addr:street", "Road No 82"))
            .with_child(tag("highway", "bus_stop"));
        let record = shape(&element);

        let fields = record.address.as_ref().and_then(Address::fields).unwrap();
        assert_eq!(fields.get("housenumber"), Some("8-2-293"));
        assert_eq!(fields.get("street"), Some("Road No 82"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_postcode_followed_by_city_leaves_mapping() {
        let element = node("1")
            .with_child(tag("addr:postcode", "500 001"))
            .with_child(tag("addr:city", "Hyderabad"));
        let record = shape(&element);

        // The bare postcode string never survives: the mapping replaces it
        assert_eq!(
            serde_json::to_value(&record.address).unwrap(),
            json!({"postcode": "500 001", "city": "Hyderabad"})
        );
    }

    #[test]
    fn test_postcode_alone_keeps_raw_value_in_mapping() {
        let element = node("1").with_child(tag("addr:postcode", "500 081"));
        let record = shape(&element);

        let fields = record.address.as_ref().and_then(Address::fields).unwrap();
        assert_eq!(fields.get("postcode"), Some("500 081"));
    }

    #[test]
    fn test_duplicate_address_suffix_last_wins() {
        let element = node("1")
            .with_child(tag("addr:city", "Secunderabad"))
            .with_child(tag("addr:street", "MG Road"))
            .with_child(tag("addr:city", "Hyderabad"));
        let record = shape(&element);

        assert_eq!(
            serde_json::to_value(&record.address).unwrap(),
            json!({"city": "Hyderabad", "street": "MG Road"})
        );
    }

    #[test]
    fn test_problem_and_compound_keys_are_skipped() {
        let element = node("1")
            .with_child(tag("addr:street:name", "Old Name"))
            .with_child(tag("addr:house number", "12"))
            .with_child(tag("addr.city", "Hyderabad"));
        assert!(shape(&element).address.is_none());
    }

    #[test]
    fn test_problem_key_without_value_is_skipped() {
        // Rejected keys are dropped before their value is looked at
        let element =
            node("1").with_child(RawElement::new("tag").with_attribute("k", "addr:a:b"));
        assert!(shape(&element).address.is_none());
    }

    #[test]
    fn test_address_key_is_not_an_address_part() {
        let element = node("1").with_child(tag("address", "Somewhere"));
        assert!(shape(&element).address.is_none());
    }

    #[test]
    fn test_tag_key_classify() {
        assert_eq!(TagKey::classify("addr:postcode"), TagKey::Address("postcode"));
        assert_eq!(TagKey::classify("addr:"), TagKey::Address(""));
        assert_eq!(TagKey::classify("name:en:old"), TagKey::Compound);
        assert_eq!(TagKey::classify("a=b"), TagKey::Problem);
        assert_eq!(TagKey::classify("name:te"), TagKey::Other);
    }

    #[test]
    fn test_serialized_record() {
        let element = RawElement::new("node")
            .with_attribute("id", "245")
            .with_attribute("lat", "17.5")
            .with_attribute("lon", "78.25")
            .with_attribute("version", "1")
            .with_attribute("user", "mapper")
            .with_child(tag("amenity", "place_of_worship"))
            .with_child(tag("name", "Old Temple Rd"))
            .with_child(tag("addr:city", "Hyderabad"));
        let record = shape(&element);

        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            concat!(
                r#"{"pos":[17.5,78.25],"id":"245","type":"node","visible":null,"#,
                r#""amenity":"place of worship","name":"Old Temple Road","#,
                r#""created":{"version":"1","user":"mapper"},"#,
                r#""address":{"city":"Hyderabad"}}"#
            )
        );
    }
}
