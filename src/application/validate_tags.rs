//! Validate tags use case

use crate::domain::tags::{normalize_tag, TagValidator, ValidationReport};
use std::collections::BTreeMap;

/// Validate each tag, keyed by the input as given.
pub fn validate_tags(validator: &TagValidator, tags: &[String]) -> BTreeMap<String, ValidationReport> {
    tags.iter()
        .map(|input| (input.clone(), validator.validate(&normalize_tag(input))))
        .collect()
}
