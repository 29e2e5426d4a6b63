//! Configuration constants and fixed lookup tables for the converter.
//!
//! Everything here is immutable and initialized once per process. Regex
//! statics are compiled lazily on first use.

use regex::Regex;
use std::sync::LazyLock;

use crate::clean::NameRule;

/// Extension appended to the input file name to form the output path.
pub const OUTPUT_EXTENSION: &str = "json";

/// Indent used for pretty-printed output documents.
pub const JSON_INDENT: &[u8] = b"  ";

/// Element attributes collected into the `created` sub-document.
pub const CREATED_KEYS: [&str; 5] = ["version", "changeset", "timestamp", "user", "uid"];

/// Prefix of tag keys that hold address parts.
pub const ADDRESS_PREFIX: &str = "addr:";

/// Tag key whose value is also cleaned as a postal code.
pub const POSTCODE_KEY: &str = "addr:postcode";

/// Tag key holding the street of an address.
pub const STREET_KEY: &str = "addr:street";

/// Street types considered well-formed when auditing.
pub const EXPECTED_STREET_TYPES: [&str; 12] = [
    "Street",
    "Avenue",
    "Boulevard",
    "Drive",
    "Court",
    "Place",
    "Square",
    "Lane",
    "Road",
    "Trail",
    "Parkway",
    "Commons",
];

/// Street-name abbreviations and their expansions, in application order.
///
/// Order matters: each rule sees the output of the rules before it.
pub const NAME_ABBREVIATIONS: [(&str, &str); 14] = [
    (" St", " Street"),
    ("Ave", "Avenue"),
    (" rd", " Road"),
    (" rd ", " Road"),
    ("Rd", "Road"),
    (" Rd", " Road"),
    ("Rd,", " Road"),
    ("road", "Road"),
    ("ln", "Lane"),
    ("Ln", "Lane"),
    ("Apts", "Apartments"),
    (" st ", " Street"),
    ("RD", "Road"),
    ("Jn", "Junction"),
];

/// Compiled form of [`NAME_ABBREVIATIONS`].
#[allow(clippy::expect_used)] // Abbreviations are escaped, so compilation cannot fail
pub static NAME_RULES: LazyLock<Vec<NameRule>> = LazyLock::new(|| {
    NAME_ABBREVIATIONS
        .iter()
        .map(|(abbreviation, expansion)| {
            NameRule::new(abbreviation, expansion).expect("valid name rule")
        })
        .collect()
});

/// Characters that make a tag key unusable as a JSON field name.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static PROBLEM_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"[=+/&<>;'"?%#$@,. \t\r\n]"##).expect("valid regex"));

/// Keys with three or more colon-separated parts (e.g. `addr:street:name`).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static COMPOUND_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+:\w+:\w+").expect("valid regex"));

/// Keys made only of lowercase letters and underscores.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static LOWER_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_]*$").expect("valid regex"));

/// Lowercase keys with exactly one colon (e.g. `addr:city`).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static LOWER_COLON_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_]*:[a-z_]*$").expect("valid regex"));

/// Last token of a street name, optionally ending in a period.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static STREET_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\S+\.?$").expect("valid regex"));
