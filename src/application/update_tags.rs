//! Frontmatter tag updates
//!
//! Adds and removes tags in the frontmatter of listed files and migrates a leading
//! run of hashtag-only lines into the frontmatter. Each file is handled on its own;
//! a file that cannot be resolved, read, parsed or written is recorded in the
//! outcome and the batch continues.

use crate::domain::tags::migration::{extract_leading_tags, find_boundary, strip_leading_lines};
use crate::domain::tags::{eq_fold, normalize_tags, remove_hashtag};
use crate::domain::FrontmatterDocument;
use crate::error::{Result, TagError};
use crate::infrastructure::{CancelToken, NoteRepository, Vault};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    pub add: Vec<String>,
    pub remove: Vec<String>,
    /// Paths relative to the vault root
    pub files: Vec<PathBuf>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub modified_files: Vec<PathBuf>,
    pub files_migrated: Vec<PathBuf>,
    pub tags_added: BTreeMap<String, usize>,
    pub tags_removed: BTreeMap<String, usize>,
    pub errors: Vec<String>,
    pub dry_run: bool,
    pub cancelled: bool,
}

impl UpdateOutcome {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Normalize both lists and drop every tag present in both (case-insensitive).
///
/// Fails with [`TagError::NoOperations`] when that leaves nothing to do. Two lists
/// that were empty to begin with are accepted: such a run only migrates.
pub fn resolve_conflicts(add: &[String], remove: &[String]) -> Result<(Vec<String>, Vec<String>)> {
    let add = dedup_ignore_case(normalize_tags(add));
    let remove = dedup_ignore_case(normalize_tags(remove));
    let requested = !add.is_empty() || !remove.is_empty();

    let kept_add: Vec<String> = add
        .iter()
        .filter(|tag| !contains_ignore_case(&remove, tag))
        .cloned()
        .collect();
    let kept_remove: Vec<String> = remove
        .iter()
        .filter(|tag| !contains_ignore_case(&add, tag))
        .cloned()
        .collect();

    if requested && kept_add.is_empty() && kept_remove.is_empty() {
        return Err(TagError::NoOperations);
    }
    Ok((kept_add, kept_remove))
}

/// Apply an update to every listed file.
pub fn update_tags(
    vault: &Vault,
    options: UpdateOptions,
    cancel: &CancelToken,
) -> Result<UpdateOutcome> {
    let (add, remove) = resolve_conflicts(&options.add, &options.remove)?;

    let mut outcome = UpdateOutcome {
        dry_run: options.dry_run,
        ..UpdateOutcome::default()
    };

    for relative in &options.files {
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            break;
        }

        let mut edit = FileEdit::default();
        match update_file(vault, relative, &add, &remove, options.dry_run, &mut edit) {
            Ok(()) => edit.commit(relative, &mut outcome),
            Err(err) => {
                warn!(path = %relative.display(), error = %err, "update failed");
                outcome
                    .errors
                    .push(format!("{}: {}", relative.display(), err));
            }
        }
    }

    info!(
        modified = outcome.modified_files.len(),
        migrated = outcome.files_migrated.len(),
        errors = outcome.errors.len(),
        dry_run = outcome.dry_run,
        "update finished"
    );
    Ok(outcome)
}

/// What happened to one file; merged into the outcome only once the file succeeds
#[derive(Debug, Default)]
struct FileEdit {
    migrated: bool,
    modified: bool,
    added: Vec<String>,
    removed: Vec<String>,
}

impl FileEdit {
    fn commit(self, relative: &Path, outcome: &mut UpdateOutcome) {
        if self.migrated {
            outcome.files_migrated.push(relative.to_path_buf());
        }
        if self.modified {
            outcome.modified_files.push(relative.to_path_buf());
        }
        for tag in self.added {
            *outcome.tags_added.entry(tag).or_default() += 1;
        }
        for tag in self.removed {
            *outcome.tags_removed.entry(tag).or_default() += 1;
        }
    }
}

fn update_file(
    vault: &Vault,
    relative: &Path,
    add: &[String],
    remove: &[String],
    dry_run: bool,
    edit: &mut FileEdit,
) -> Result<()> {
    let path = vault.resolve(relative)?;
    let content = vault.read_note(&path)?;
    let mut doc = FrontmatterDocument::parse(&content)?;
    let mut tags = doc.frontmatter.tags().to_vec();

    let mut to_add = add.to_vec();
    let boundary = find_boundary(&doc.body);
    let leading = normalize_tags(&extract_leading_tags(&doc.body, boundary));
    if !leading.is_empty() {
        edit.migrated = true;
        doc.body = strip_leading_lines(&doc.body, boundary);
        for tag in leading {
            if !contains_ignore_case(remove, &tag) && !contains_ignore_case(&to_add, &tag) {
                to_add.push(tag);
            }
        }
    }

    for tag in to_add {
        if !contains_ignore_case(&tags, &tag) {
            tags.push(tag.clone());
            edit.added.push(tag);
        }
    }

    let mut body_changed = false;
    for tag in remove {
        let before = tags.len();
        tags.retain(|existing| !eq_fold(existing, tag));
        edit.removed
            .extend(std::iter::repeat(tag.clone()).take(before - tags.len()));

        let stripped = remove_hashtag(&doc.body, tag);
        if stripped.replacements > 0 {
            doc.body = stripped.content;
            body_changed = true;
        }
    }

    edit.modified =
        edit.migrated || !edit.added.is_empty() || !edit.removed.is_empty() || body_changed;
    if !edit.modified {
        debug!(path = %relative.display(), "nothing to change");
        return Ok(());
    }

    tags.sort_by_key(|tag| tag.to_lowercase());
    doc.frontmatter.set_tags(tags);
    let rendered = doc.render()?;

    if !dry_run {
        vault.write_note(&path, &rendered)?;
    }
    debug!(path = %relative.display(), dry_run, "updated file");
    Ok(())
}

fn contains_ignore_case(tags: &[String], tag: &str) -> bool {
    tags.iter().any(|existing| eq_fold(existing, tag))
}

fn dedup_ignore_case(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !contains_ignore_case(&unique, &tag) {
            unique.push(tag);
        }
    }
    unique
}
