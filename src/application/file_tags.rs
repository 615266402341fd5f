//! Tags for explicit files

use crate::domain::FileTagRecord;
use crate::error::{Result, TagError};
use crate::infrastructure::{CancelToken, TagScanner};
use std::collections::BTreeSet;
use std::path::{self, PathBuf};
use tracing::warn;

/// Tag each listed file. A file that cannot be read yields an empty tag set
/// rather than failing the call.
pub fn get_tags_for_files(
    scanner: &TagScanner,
    paths: &[PathBuf],
    cancel: &CancelToken,
) -> Result<Vec<FileTagRecord>> {
    let mut records = Vec::with_capacity(paths.len());

    for path in paths {
        if cancel.is_cancelled() {
            return Err(TagError::Cancelled);
        }

        let path = path::absolute(path).unwrap_or_else(|_| path.clone());
        let record = scanner.scan_file(&path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "could not read file");
            FileTagRecord::new(path.clone(), BTreeSet::new())
        });
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::Config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unreadable_files_get_empty_tags() {
        let temp = TempDir::new().unwrap();
        let present = temp.path().join("present.md");
        fs::write(&present, "#golang").unwrap();
        let missing = temp.path().join("missing.md");

        let scanner = TagScanner::new(&Config::default()).unwrap();
        let records =
            get_tags_for_files(&scanner, &[present.clone(), missing.clone()], &CancelToken::new())
                .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].path, present);
        assert!(records[0].has_tag("golang"));
        assert_eq!(records[1].path, missing);
        assert!(records[1].tags.is_empty());
    }

    #[test]
    fn test_cancelled_before_first_file() {
        let scanner = TagScanner::new(&Config::default()).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = get_tags_for_files(&scanner, &[PathBuf::from("x.md")], &cancel);
        assert!(matches!(result, Err(TagError::Cancelled)));
    }
}
