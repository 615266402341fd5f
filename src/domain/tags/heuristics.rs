//! False-positive filters shared by the extractor and the validator

use crate::infrastructure::Config;

const URL_FRAGMENTS: &[&str] = &[
    "http",
    "https",
    "ftp",
    "www",
    ".com",
    ".org",
    ".net",
    "localhost",
    "127.0.0.1",
    "::1",
];

/// Strip surrounding whitespace and a leading marker from a user-supplied tag.
pub fn normalize_tag(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed).trim().to_string()
}

/// Normalize a list of tags, dropping entries that end up empty.
pub fn normalize_tags<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .map(|tag| normalize_tag(tag.as_ref()))
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Case-insensitive tag comparison with full Unicode lowercasing.
pub fn eq_fold(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// The tunable part of the filter pipeline, copied out of a [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct Heuristics {
    pub min_length: usize,
    pub max_digit_ratio: f64,
    pub exclude_keywords: Vec<String>,
}

impl Heuristics {
    pub fn from_config(config: &Config) -> Self {
        Heuristics {
            min_length: config.min_tag_length,
            max_digit_ratio: config.max_digit_ratio,
            exclude_keywords: config
                .exclude_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// True when a candidate survives every filter. Rejections are silent.
    pub fn accepts(&self, tag: &str) -> bool {
        tag.chars().count() >= self.min_length
            && starts_with_letter(tag)
            && has_only_tag_chars(tag)
            && !tag.contains("--")
            && self.excluded_keyword(tag).is_none()
            && !is_hex_color(tag)
            && !looks_like_id(tag)
            && !is_url_fragment(tag)
            && digit_ratio(tag) <= self.max_digit_ratio
    }

    /// First configured keyword contained in `tag`, compared case-insensitively.
    pub fn excluded_keyword(&self, tag: &str) -> Option<&str> {
        let lower = tag.to_lowercase();
        self.exclude_keywords
            .iter()
            .find(|keyword| lower.contains(keyword.as_str()))
            .map(String::as_str)
    }
}

pub fn starts_with_letter(tag: &str) -> bool {
    tag.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

pub fn starts_with_digit(tag: &str) -> bool {
    tag.chars().next().is_some_and(|c| c.is_ascii_digit())
}

pub fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

pub fn has_only_tag_chars(tag: &str) -> bool {
    tag.chars().all(is_tag_char)
}

pub fn is_hex_color(tag: &str) -> bool {
    (tag.len() == 3 || tag.len() == 6) && tag.chars().all(|c| c.is_ascii_hexdigit())
}

/// Long digit runs, or long mixed-case alphanumerics, read as identifiers or hashes.
pub fn looks_like_id(tag: &str) -> bool {
    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut run = 0usize;
    let mut longest_run = 0usize;

    for c in tag.chars() {
        if c.is_ascii_digit() {
            has_digit = true;
            run += 1;
            longest_run = longest_run.max(run);
            continue;
        }

        run = 0;
        if c.is_ascii_uppercase() {
            has_upper = true;
        } else if c.is_ascii_lowercase() {
            has_lower = true;
        }
    }

    longest_run > 4 || (has_upper && has_lower && has_digit && tag.chars().count() > 12)
}

pub fn is_url_fragment(tag: &str) -> bool {
    let lower = tag.to_lowercase();
    URL_FRAGMENTS.iter().any(|fragment| lower.contains(fragment))
}

pub fn digit_ratio(tag: &str) -> f64 {
    let len = tag.chars().count();
    if len == 0 {
        return 0.0;
    }
    let digits = tag.chars().filter(|c| c.is_ascii_digit()).count();
    digits as f64 / len as f64
}
