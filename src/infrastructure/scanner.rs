//! Lazy directory scanning
//!
//! [`TagScanner::scan`] walks a tree one file at a time: a file is read, tagged and
//! yielded before the next one is visited, so nothing is buffered ahead and a
//! caller can stop at any point.

use crate::domain::tags::TagExtractor;
use crate::domain::FileTagRecord;
use crate::error::{Result, TagError};
use crate::infrastructure::Config;
use globset::GlobSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Cooperative cancellation, checked between files
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that trips once `timeout` has elapsed
    pub fn with_timeout(timeout: Duration) -> Self {
        CancelToken {
            flag: Arc::default(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Extracts tags from the markdown files of a tree, honouring exclusions
#[derive(Debug, Clone)]
pub struct TagScanner {
    extractor: TagExtractor,
    exclude_dirs: Vec<String>,
    exclude_globs: GlobSet,
}

impl TagScanner {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(TagScanner {
            extractor: TagExtractor::new(config)?,
            exclude_dirs: config.exclude_dirs.clone(),
            exclude_globs: config.exclude_globs()?,
        })
    }

    pub fn extractor(&self) -> &TagExtractor {
        &self.extractor
    }

    /// Read and tag a single file
    pub fn scan_file(&self, path: &Path) -> Result<FileTagRecord> {
        let bytes = fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes);
        let tags = self.extractor.extract(&content);
        trace!(path = %path.display(), tags = tags.len(), "scanned file");
        Ok(FileTagRecord::new(path.to_path_buf(), tags))
    }

    /// Start a fresh, forward-only scan of `root`
    pub fn scan<'a>(&'a self, root: &Path, cancel: &CancelToken) -> TagScan<'a> {
        debug!(root = %root.display(), "starting scan");
        TagScan {
            scanner: self,
            root: root.to_path_buf(),
            walker: WalkDir::new(root).sort_by_file_name().into_iter(),
            cancel: cancel.clone(),
            finished: false,
        }
    }

    fn is_excluded_path(&self, relative: &str) -> bool {
        self.exclude_dirs
            .iter()
            .any(|dir| !dir.is_empty() && relative.contains(dir.as_str()))
    }

    fn is_candidate_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name.ends_with(".md") && !self.exclude_globs.is_match(name)
    }
}

/// Iterator over the per-file results of one scan
pub struct TagScan<'a> {
    scanner: &'a TagScanner,
    root: PathBuf,
    walker: walkdir::IntoIter,
    cancel: CancelToken,
    finished: bool,
}

impl Iterator for TagScan<'_> {
    type Item = Result<FileTagRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            if self.cancel.is_cancelled() {
                self.finished = true;
                return Some(Err(TagError::Cancelled));
            }

            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(TagError::Walk(err))),
            };

            if entry.depth() == 0 {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();

            if self.scanner.is_excluded_path(&relative) {
                if entry.file_type().is_dir() {
                    debug!(path = %relative, "skipping excluded directory");
                    self.walker.skip_current_dir();
                }
                continue;
            }

            if !entry.file_type().is_file() || !self.scanner.is_candidate_file(entry.path()) {
                continue;
            }

            return Some(self.scanner.scan_file(entry.path()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn vault() -> TempDir {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "file1.md", "# File 1\n#golang #programming");
        write(temp.path(), "file2.md", "# File 2\n#python #data-science");
        write(temp.path(), "untagged.md", "# Untagged\nNo tags here");
        write(temp.path(), "file.excalidraw.md", "# Excalidraw\n#diagram");
        write(temp.path(), "subdir/file3.md", "# File 3\n#javascript");
        write(temp.path(), "100 Archive/old.md", "# Old\n#archived");
        write(temp.path(), "notes.txt", "#plaintext");
        temp
    }

    #[test]
    fn test_scan_skips_excluded_paths() {
        let temp = vault();
        let scanner = TagScanner::new(&Config::default()).unwrap();

        let records: Vec<FileTagRecord> = scanner
            .scan(temp.path(), &CancelToken::new())
            .collect::<Result<_>>()
            .unwrap();

        let relative: Vec<PathBuf> = records
            .iter()
            .map(|r| r.path.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("file1.md"),
                PathBuf::from("file2.md"),
                PathBuf::from("subdir/file3.md"),
                PathBuf::from("untagged.md"),
            ]
        );
        assert_eq!(
            records[0].tags,
            BTreeSet::from(["golang".to_string(), "programming".to_string()])
        );
        assert!(records[3].tags.is_empty());
    }

    #[test]
    fn test_scan_is_lazy_and_can_be_abandoned() {
        let temp = vault();
        let scanner = TagScanner::new(&Config::default()).unwrap();

        let first: Vec<_> = scanner.scan(temp.path(), &CancelToken::new()).take(1).collect();
        assert_eq!(first.len(), 1);

        // each call starts over
        let again = scanner.scan(temp.path(), &CancelToken::new()).count();
        assert_eq!(again, 4);
    }

    #[test]
    fn test_cancelled_scan_stops_with_error() {
        let temp = vault();
        let scanner = TagScanner::new(&Config::default()).unwrap();
        let cancel = CancelToken::new();

        let mut scan = scanner.scan(temp.path(), &cancel);
        assert!(scan.next().unwrap().is_ok());
        cancel.cancel();
        assert!(matches!(scan.next(), Some(Err(TagError::Cancelled))));
        assert!(scan.next().is_none());
    }

    #[test]
    fn test_expired_deadline_cancels() {
        let token = CancelToken::with_timeout(Duration::ZERO);
        assert!(token.is_cancelled());
        assert!(!CancelToken::new().is_cancelled());
    }

    #[test]
    fn test_missing_root_yields_walk_error() {
        let temp = TempDir::new().unwrap();
        let scanner = TagScanner::new(&Config::default()).unwrap();
        let results: Vec<_> = scanner
            .scan(&temp.path().join("missing"), &CancelToken::new())
            .collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(TagError::Walk(_))));
    }
}
