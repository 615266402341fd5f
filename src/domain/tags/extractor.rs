//! Tag extraction from markdown text
//!
//! Three notations are recognised independently: inline `#hashtags`, a one-line
//! `tags: [a, b]` array and a `tags:` block followed by indented `- item` lines.
//! Every candidate goes through [`Heuristics::accepts`] before it is kept.

use super::heuristics::{is_tag_char, normalize_tag, Heuristics};
use crate::error::Result;
use crate::infrastructure::config::{Config, TagPatterns};
use std::collections::BTreeSet;

/// Compiled extractor for one configuration
#[derive(Debug, Clone)]
pub struct TagExtractor {
    patterns: TagPatterns,
    heuristics: Heuristics,
}

impl TagExtractor {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(TagExtractor {
            patterns: config.compile_patterns()?,
            heuristics: Heuristics::from_config(config),
        })
    }

    pub fn heuristics(&self) -> &Heuristics {
        &self.heuristics
    }

    /// Extract the deduplicated set of tags found in `text`.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();

        for found in self.patterns.hashtag.find_iter(text) {
            let tag = normalize_tag(found.as_str());
            if self.heuristics.accepts(&tag) && has_bounded_occurrence(text, found.as_str()) {
                tags.insert(tag);
            }
        }

        if let Some(captures) = self.patterns.inline_tags.captures(text) {
            if let Some(items) = captures.get(1) {
                for item in items.as_str().split(',') {
                    self.keep(unquote(item), &mut tags);
                }
            }
        }

        if let Some(captures) = self.patterns.list_tags.captures(text) {
            if let Some(items) = captures.get(1) {
                for line in items.as_str().lines() {
                    let item = line.trim();
                    let item = item.strip_prefix('-').unwrap_or(item);
                    self.keep(unquote(item), &mut tags);
                }
            }
        }

        tags
    }

    fn keep(&self, candidate: &str, tags: &mut BTreeSet<String>) {
        if self.heuristics.accepts(candidate) {
            tags.insert(candidate.to_string());
        }
    }
}

/// Trim whitespace and any surrounding quote characters.
pub(crate) fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

/// Byte offsets of every occurrence of `needle` in `haystack` that stands alone:
/// not glued to a word, an email or another identifier on the left, and not
/// continued by tag characters on the right.
pub(crate) fn bounded_occurrences(haystack: &str, needle: &str) -> Vec<usize> {
    let bytes = haystack.as_bytes();
    let mut offsets = Vec::new();
    if needle.is_empty() {
        return offsets;
    }

    let mut start = 0usize;
    while let Some(found) = haystack[start..].find(needle) {
        let index = start + found;
        let end = index + needle.len();

        if is_bounded(bytes, index, end) {
            offsets.push(index);
        }

        start = index + haystack[index..].chars().next().map_or(1, char::len_utf8);
    }

    offsets
}

/// Boundary rule for a match at `index..end`.
pub(crate) fn is_bounded(bytes: &[u8], index: usize, end: usize) -> bool {
    let valid_before = index == 0 || {
        let prev = bytes[index - 1];
        !(prev == b'@' || is_tag_char(prev as char))
    };
    valid_before && (end >= bytes.len() || !is_tag_char(bytes[end] as char))
}

/// True when at least one occurrence of `needle` passes the boundary rule.
pub(crate) fn has_bounded_occurrence(haystack: &str, needle: &str) -> bool {
    !bounded_occurrences(haystack, needle).is_empty()
}
