//! List tags use case

use super::for_each_record;
use crate::domain::records::sort_by_usage;
use crate::domain::TagInfo;
use crate::error::Result;
use crate::infrastructure::{CancelToken, NoteRepository, TagScanner, Vault};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Service for listing all tags used across a vault.
pub struct ListTagsService {
    vault: Vault,
    scanner: TagScanner,
}

impl ListTagsService {
    pub fn new(vault: Vault, scanner: TagScanner) -> Self {
        ListTagsService { vault, scanner }
    }

    /// Every tag used in at least `min_count` files, grouped by lowercase name.
    pub fn execute(&self, min_count: usize, cancel: &CancelToken) -> Result<Vec<TagInfo>> {
        let mut usage: BTreeMap<String, BTreeSet<PathBuf>> = BTreeMap::new();

        for_each_record(self.scanner.scan(self.vault.root(), cancel), |record| {
            for tag in &record.tags {
                usage
                    .entry(tag.to_lowercase())
                    .or_default()
                    .insert(record.path.clone());
            }
        })?;

        let mut infos: Vec<TagInfo> = usage
            .into_iter()
            .filter(|(_, files)| files.len() >= min_count)
            .map(|(name, files)| TagInfo::new(name, files.into_iter().collect()))
            .collect();
        sort_by_usage(&mut infos);
        Ok(infos)
    }
}

/// Keep only tags whose name contains `pattern`, ignoring case.
pub fn filter_by_pattern(infos: Vec<TagInfo>, pattern: &str) -> Vec<TagInfo> {
    let pattern = pattern.to_lowercase();
    infos
        .into_iter()
        .filter(|info| info.name.to_lowercase().contains(&pattern))
        .collect()
}
