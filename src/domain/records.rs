//! Per-file and per-tag scan results

use super::tags::eq_fold;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Tags found in one file during one scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileTagRecord {
    pub path: PathBuf,
    pub tags: BTreeSet<String>,
}

impl FileTagRecord {
    pub fn new(path: PathBuf, tags: BTreeSet<String>) -> Self {
        FileTagRecord { path, tags }
    }

    /// Case-insensitive membership test
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| eq_fold(t, tag))
    }
}

/// Usage summary for one tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagInfo {
    pub name: String,
    pub count: usize,
    pub files: Vec<PathBuf>,
}

impl TagInfo {
    pub fn new(name: String, files: Vec<PathBuf>) -> Self {
        TagInfo {
            name,
            count: files.len(),
            files,
        }
    }
}

/// Most used first, then alphabetical
pub fn sort_by_usage(infos: &mut [TagInfo]) {
    infos.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_tag_ignores_case() {
        let record = FileTagRecord::new(
            PathBuf::from("/vault/a.md"),
            BTreeSet::from(["Golang".to_string()]),
        );
        assert!(record.has_tag("golang"));
        assert!(!record.has_tag("rust"));
    }

    #[test]
    fn test_sort_by_usage() {
        let mut infos = vec![
            TagInfo::new("beta".to_string(), vec![PathBuf::from("a")]),
            TagInfo::new("alpha".to_string(), vec![PathBuf::from("a")]),
            TagInfo::new("gamma".to_string(), vec![PathBuf::from("a"), PathBuf::from("b")]),
        ];
        sort_by_usage(&mut infos);
        let names: Vec<&str> = infos.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["gamma", "alpha", "beta"]);
    }
}
