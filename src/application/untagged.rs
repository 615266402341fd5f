//! Untagged files use case

use super::for_each_record;
use crate::error::Result;
use crate::infrastructure::{CancelToken, NoteRepository, TagScanner, Vault};
use std::path::PathBuf;

/// Service for finding notes that carry no tags at all.
pub struct UntaggedService {
    vault: Vault,
    scanner: TagScanner,
}

impl UntaggedService {
    pub fn new(vault: Vault, scanner: TagScanner) -> Self {
        UntaggedService { vault, scanner }
    }

    pub fn execute(&self, cancel: &CancelToken) -> Result<Vec<PathBuf>> {
        let mut untagged = Vec::new();
        for_each_record(self.scanner.scan(self.vault.root(), cancel), |record| {
            if record.tags.is_empty() {
                untagged.push(record.path);
            }
        })?;
        Ok(untagged)
    }
}
