//! Configuration management

use crate::error::{Result, TagError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable consulted when no `--config` flag is given
pub const CONFIG_ENV_VAR: &str = "TAGMEND_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory names skipped during scans (substring match on the relative path)
    pub exclude_dirs: Vec<String>,
    /// Filename globs skipped during scans
    pub exclude_patterns: Vec<String>,
    pub hashtag_pattern: String,
    pub inline_tags_pattern: String,
    pub list_tags_pattern: String,
    pub min_tag_length: usize,
    pub max_digit_ratio: f64,
    pub exclude_keywords: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            exclude_dirs: vec![
                "100 Archive".to_string(),
                "Attachments".to_string(),
                ".git".to_string(),
            ],
            exclude_patterns: vec!["*.excalidraw.md".to_string()],
            hashtag_pattern: r"#[a-zA-Z][a-zA-Z0-9_\-]*".to_string(),
            inline_tags_pattern: r"(?m)^tags:\s*\[([^\]]+)\]".to_string(),
            list_tags_pattern: r"(?m)^tags:\s*$\n((?:\s+-\s+.+\n?)+)".to_string(),
            min_tag_length: 3,
            max_digit_ratio: 0.5,
            exclude_keywords: ["bibr", "ftn", "issuecomment", "discussion", "diff-"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Regexes compiled from a [`Config`]
#[derive(Debug, Clone)]
pub struct TagPatterns {
    pub hashtag: Regex,
    pub inline_tags: Regex,
    pub list_tags: Regex,
}

impl Config {
    /// Load config from a TOML file; fields absent from the file keep their defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TagError::Config(format!("Config file not found: {}", path.display()))
            } else {
                TagError::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config for one invocation: explicit path, then `TAGMEND_CONFIG`, then defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load_from_file(Path::new(&path)),
            _ => Ok(Config::default()),
        }
    }

    /// Check numeric ranges and make sure every pattern compiles
    pub fn validate(&self) -> Result<()> {
        if self.min_tag_length < 1 {
            return Err(TagError::Config(
                "min_tag_length must be at least 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.max_digit_ratio) {
            return Err(TagError::Config(
                "max_digit_ratio must be between 0 and 1".to_string(),
            ));
        }

        if self.hashtag_pattern.is_empty() {
            return Err(TagError::Config(
                "hashtag_pattern cannot be empty".to_string(),
            ));
        }

        self.compile_patterns()?;
        self.exclude_globs()?;
        Ok(())
    }

    pub fn compile_patterns(&self) -> Result<TagPatterns> {
        Ok(TagPatterns {
            hashtag: compile("hashtag_pattern", &self.hashtag_pattern)?,
            inline_tags: compile("inline_tags_pattern", &self.inline_tags_pattern)?,
            list_tags: compile("list_tags_pattern", &self.list_tags_pattern)?,
        })
    }

    pub fn exclude_globs(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude_patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                TagError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| TagError::Config(format!("Invalid exclude patterns: {}", e)))
    }
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| TagError::InvalidPattern { field, source })
}
