//! Batch tag replacement
//!
//! Renames tags across a vault in every notation. Files are processed one by one:
//! a file that fails to read or write is recorded and the batch moves on, so a
//! run can leave some files rewritten and others untouched.

use super::for_each_record;
use crate::domain::tags::{normalize_tag, rename_tag};
use crate::error::{Result, TagError};
use crate::infrastructure::{CancelToken, NoteRepository, TagScanner, Vault};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ReplaceOptions {
    /// `(old, new)` pairs, applied in order to each file
    pub pairs: Vec<(String, String)>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaceOutcome {
    pub modified_files: Vec<PathBuf>,
    pub failed_files: Vec<PathBuf>,
    /// One message per entry of `failed_files`, same order
    pub errors: Vec<String>,
    pub dry_run: bool,
    pub cancelled: bool,
}

impl ReplaceOutcome {
    fn fail(&mut self, path: &Path, err: TagError) {
        warn!(path = %path.display(), error = %err, "replace failed");
        self.failed_files.push(path.to_path_buf());
        self.errors.push(format!("{}: {}", path.display(), err));
    }
}

/// Parse `old:new,old2:new2` into pairs.
pub fn parse_pairs(raw: &str) -> Result<Vec<(String, String)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.split_once(':')
                .map(|(old, new)| (old.trim().to_string(), new.trim().to_string()))
                .ok_or_else(|| {
                    TagError::InvalidArgument(format!(
                        "replacement '{}' must have the form old:new",
                        item
                    ))
                })
        })
        .collect()
}

/// Rename tags across every candidate file under the vault root.
pub fn replace_batch(
    vault: &Vault,
    scanner: &TagScanner,
    options: ReplaceOptions,
    cancel: &CancelToken,
) -> Result<ReplaceOutcome> {
    let pairs = normalize_pairs(&options.pairs)?;

    let mut candidates = Vec::new();
    for_each_record(scanner.scan(vault.root(), cancel), |record| {
        if pairs.iter().any(|(old, _)| record.has_tag(old)) {
            candidates.push(record.path);
        }
    })?;
    debug!(candidates = candidates.len(), "replace candidates found");

    let mut outcome = ReplaceOutcome {
        dry_run: options.dry_run,
        ..ReplaceOutcome::default()
    };

    for path in &candidates {
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            break;
        }

        let content = match vault.read_note(path) {
            Ok(content) => content,
            Err(err) => {
                outcome.fail(path, err);
                continue;
            }
        };

        let rewritten = pairs.iter().fold(content.clone(), |text, (old, new)| {
            rename_tag(&text, old, new).content
        });
        if rewritten == content {
            continue;
        }

        if !options.dry_run {
            if let Err(err) = vault.write_note(path, &rewritten) {
                outcome.fail(path, err);
                continue;
            }
        }
        debug!(path = %path.display(), "tags replaced");
        outcome.modified_files.push(path.clone());
    }

    info!(
        modified = outcome.modified_files.len(),
        failed = outcome.failed_files.len(),
        dry_run = outcome.dry_run,
        "replace finished"
    );
    Ok(outcome)
}

fn normalize_pairs(pairs: &[(String, String)]) -> Result<Vec<(String, String)>> {
    if pairs.is_empty() {
        return Err(TagError::InvalidArgument(
            "at least one replacement is required".to_string(),
        ));
    }

    pairs
        .iter()
        .map(|(old, new)| {
            let (old, new) = (normalize_tag(old), normalize_tag(new));
            if old.is_empty() || new.is_empty() {
                return Err(TagError::InvalidArgument(
                    "replacement tags cannot be empty".to_string(),
                ));
            }
            Ok((old, new))
        })
        .collect()
}
