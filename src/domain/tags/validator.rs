//! Tag validation with human-readable issues and suggested fixes

use super::heuristics::{
    digit_ratio, has_only_tag_chars, is_hex_color, is_tag_char, is_url_fragment, looks_like_id,
    normalize_tag, starts_with_digit, starts_with_letter, Heuristics,
};
use crate::infrastructure::Config;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

fn hyphen_run_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"-+").unwrap())
}

/// One reason a tag is not clean
#[derive(Debug, Clone, PartialEq)]
pub enum TagIssue {
    Empty,
    TooShort { min: usize },
    MustStartWithLetter,
    InvalidCharacters,
    ConsecutiveHyphens,
    InvalidConfiguration(String),
    HexColor,
    LooksLikeId,
    UrlFragment,
    ExcludedKeyword(String),
    TooManyDigits { ratio: f64, max: f64 },
}

impl TagIssue {
    /// Stable short name for the kind of issue
    pub fn category(&self) -> &'static str {
        match self {
            TagIssue::Empty => "empty",
            TagIssue::TooShort { .. } => "too-short",
            TagIssue::MustStartWithLetter => "leading-character",
            TagIssue::InvalidCharacters => "invalid-characters",
            TagIssue::ConsecutiveHyphens => "consecutive-hyphens",
            TagIssue::InvalidConfiguration(_) => "configuration",
            TagIssue::HexColor => "hex-color",
            TagIssue::LooksLikeId => "id-like",
            TagIssue::UrlFragment => "url-fragment",
            TagIssue::ExcludedKeyword(_) => "excluded-keyword",
            TagIssue::TooManyDigits { .. } => "digit-ratio",
        }
    }
}

impl fmt::Display for TagIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagIssue::Empty => write!(f, "Tag cannot be empty"),
            TagIssue::TooShort { min } => {
                write!(f, "Tag must be at least {} characters long", min)
            }
            TagIssue::MustStartWithLetter => write!(f, "Tag must start with a letter"),
            TagIssue::InvalidCharacters => write!(
                f,
                "Tag contains invalid characters (only letters, numbers, hyphens, and underscores allowed)"
            ),
            TagIssue::ConsecutiveHyphens => write!(f, "Tag contains consecutive hyphens"),
            TagIssue::InvalidConfiguration(msg) => {
                write!(f, "Invalid regex configuration: {}", msg)
            }
            TagIssue::HexColor => write!(f, "Tag appears to be a hex color code"),
            TagIssue::LooksLikeId => write!(f, "Tag appears to be an ID or hash"),
            TagIssue::UrlFragment => write!(f, "Tag appears to contain URL fragments"),
            TagIssue::ExcludedKeyword(keyword) => {
                write!(f, "Tag contains excluded keyword: {}", keyword)
            }
            TagIssue::TooManyDigits { ratio, max } => write!(
                f,
                "Tag contains too many digits ({:.0}% digits, max allowed: {:.0}%)",
                ratio * 100.0,
                max * 100.0
            ),
        }
    }
}

impl Serialize for TagIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of validating one tag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<TagIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ValidationReport {
    fn valid() -> Self {
        ValidationReport {
            is_valid: true,
            issues: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    fn flag(&mut self, issue: TagIssue) {
        self.is_valid = false;
        self.issues.push(issue);
    }

    fn suggest(&mut self, suggestion: String) {
        self.suggestions.push(suggestion);
    }
}

/// Applies the extractor's checks to a single tag and explains each failure
#[derive(Debug, Clone)]
pub struct TagValidator {
    heuristics: Heuristics,
    pattern_error: Option<String>,
}

impl TagValidator {
    pub fn new(config: &Config) -> Self {
        TagValidator {
            heuristics: Heuristics::from_config(config),
            pattern_error: config.compile_patterns().err().map(|e| e.to_string()),
        }
    }

    pub fn validate(&self, tag: &str) -> ValidationReport {
        let mut report = ValidationReport::valid();
        let tag = normalize_tag(tag);

        if tag.is_empty() {
            report.flag(TagIssue::Empty);
            return report;
        }

        if tag.chars().count() < self.heuristics.min_length {
            report.flag(TagIssue::TooShort {
                min: self.heuristics.min_length,
            });
        }

        if !starts_with_letter(&tag) {
            report.flag(TagIssue::MustStartWithLetter);
            if starts_with_digit(&tag) {
                report.suggest(format!("Consider: tag-{}", tag));
            }
        }

        if !has_only_tag_chars(&tag) {
            report.flag(TagIssue::InvalidCharacters);
            let suggested = replace_invalid_chars(&tag);
            if !suggested.is_empty() && suggested != tag {
                report.suggest(format!("Suggested: {}", suggested));
            }
        }

        if tag.contains("--") {
            report.flag(TagIssue::ConsecutiveHyphens);
            let suggested = hyphen_run_regex().replace_all(&tag, "-");
            if suggested != tag {
                report.suggest(format!("Suggested: {}", suggested));
            }
        }

        if let Some(msg) = &self.pattern_error {
            report.flag(TagIssue::InvalidConfiguration(msg.clone()));
            return report;
        }

        if is_hex_color(&tag) {
            report.flag(TagIssue::HexColor);
            report.suggest(format!("Consider: color-{}", tag));
        }

        if looks_like_id(&tag) {
            report.flag(TagIssue::LooksLikeId);
            report.suggest("Consider using a more descriptive tag name".to_string());
        }

        if is_url_fragment(&tag) {
            report.flag(TagIssue::UrlFragment);
            report.suggest("Consider using a more descriptive tag name".to_string());
        }

        if let Some(keyword) = self.heuristics.excluded_keyword(&tag) {
            report.flag(TagIssue::ExcludedKeyword(keyword.to_string()));
        }

        let ratio = digit_ratio(&tag);
        if ratio > self.heuristics.max_digit_ratio {
            report.flag(TagIssue::TooManyDigits {
                ratio,
                max: self.heuristics.max_digit_ratio,
            });
            report.suggest("Consider using more descriptive text instead of numbers".to_string());
        }

        report
    }
}

/// Replace every disallowed character with `-`, collapse runs and trim the ends.
fn replace_invalid_chars(tag: &str) -> String {
    let replaced: String = tag
        .chars()
        .map(|c| if is_tag_char(c) { c } else { '-' })
        .collect();
    hyphen_run_regex()
        .replace_all(&replaced, "-")
        .trim_matches('-')
        .to_string()
}
