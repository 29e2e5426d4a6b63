//! String cleaning for tag values: street-name abbreviations, amenity
//! values and postal codes.

use regex::Regex;

use crate::error::{ConverterError, Result};

/// A single abbreviation rule applied by [`update_name`].
///
/// The rule fires when the abbreviation appears as a whole word; it then
/// rewrites every occurrence of the abbreviation, including ones embedded in
/// longer words.
#[derive(Debug, Clone)]
pub struct NameRule {
    abbreviation: String,
    expansion: String,
    whole_word: Regex,
}

impl NameRule {
    /// Compile a rule for `abbreviation`.
    ///
    /// The abbreviation is matched literally; regex metacharacters are escaped.
    ///
    /// # Examples
    /// ```
    /// use osm_cleaner::clean::NameRule;
    ///
    /// let rule = NameRule::new("Rd", "Road").unwrap();
    /// assert_eq!(rule.expansion(), "Road");
    /// ```
    pub fn new(abbreviation: &str, expansion: &str) -> Result<Self> {
        let pattern = format!(r"\b{}\b", regex::escape(abbreviation));
        let whole_word =
            Regex::new(&pattern).map_err(|source| ConverterError::InvalidNameRule {
                abbreviation: abbreviation.to_string(),
                source,
            })?;

        Ok(Self {
            abbreviation: abbreviation.to_string(),
            expansion: expansion.to_string(),
            whole_word,
        })
    }

    /// The abbreviated form this rule looks for.
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    /// The replacement text.
    pub fn expansion(&self) -> &str {
        &self.expansion
    }

    /// Apply the rule to `name`, returning `None` when it does not fire.
    fn apply(&self, name: &str) -> Option<String> {
        self.whole_word
            .is_match(name)
            .then(|| name.replace(&self.abbreviation, &self.expansion))
    }
}

/// Expand street-name abbreviations in `name`.
///
/// Rules are applied in order and each one sees the result of the previous
/// ones, so rules can interact (`"ln"` also rewrites the `ln` inside `"Kiln"`
/// once a standalone `ln` is present).
///
/// # Examples
/// ```
/// use osm_cleaner::clean::update_name;
/// use osm_cleaner::config::NAME_RULES;
///
/// assert_eq!(update_name("Main Rd", &NAME_RULES), "Main Road");
/// assert_eq!(update_name("Charminar", &NAME_RULES), "Charminar");
/// ```
pub fn update_name(name: &str, rules: &[NameRule]) -> String {
    let mut result = name.to_string();
    for rule in rules {
        if let Some(rewritten) = rule.apply(&result) {
            result = rewritten;
        }
    }
    result
}

/// Replace underscores in an amenity value with spaces.
///
/// # Examples
/// ```
/// use osm_cleaner::clean::clean_amenity;
///
/// assert_eq!(clean_amenity("fast_food"), "fast food");
/// ```
pub fn clean_amenity(value: &str) -> String {
    value.replace('_', " ")
}

/// Remove all whitespace from a postal code.
///
/// # Examples
/// ```
/// use osm_cleaner::clean::update_postalcode;
///
/// assert_eq!(update_postalcode("500 081"), "500081");
/// ```
pub fn update_postalcode(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}
