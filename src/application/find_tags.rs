//! Find files by tag

use super::for_each_record;
use crate::domain::records::sort_by_usage;
use crate::domain::tags::normalize_tag;
use crate::domain::TagInfo;
use crate::error::Result;
use crate::infrastructure::{CancelToken, NoteRepository, TagScanner, Vault};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Service for looking up which files carry given tags.
pub struct FindTagsService {
    vault: Vault,
    scanner: TagScanner,
}

impl FindTagsService {
    pub fn new(vault: Vault, scanner: TagScanner) -> Self {
        FindTagsService { vault, scanner }
    }

    /// Map every requested tag to the files containing it (case-insensitive).
    ///
    /// Each requested tag is a key in the result, even when no file matches.
    pub fn find_by_tags(
        &self,
        tags: &[String],
        cancel: &CancelToken,
    ) -> Result<BTreeMap<String, Vec<PathBuf>>> {
        let wanted: BTreeSet<String> = tags
            .iter()
            .map(|t| normalize_tag(t))
            .filter(|t| !t.is_empty())
            .collect();

        let mut found: BTreeMap<String, Vec<PathBuf>> =
            wanted.iter().map(|t| (t.clone(), Vec::new())).collect();

        for_each_record(self.scanner.scan(self.vault.root(), cancel), |record| {
            for tag in &wanted {
                if record.has_tag(tag) {
                    if let Some(files) = found.get_mut(tag) {
                        files.push(record.path.clone());
                    }
                }
            }
        })?;

        for files in found.values_mut() {
            files.sort();
        }
        Ok(found)
    }

    /// Usage summary for each requested tag, most used first.
    pub fn tags_info(&self, tags: &[String], cancel: &CancelToken) -> Result<Vec<TagInfo>> {
        let mut infos: Vec<TagInfo> = self
            .find_by_tags(tags, cancel)?
            .into_iter()
            .map(|(name, files)| TagInfo::new(name, files))
            .collect();
        sort_by_usage(&mut infos);
        Ok(infos)
    }
}
