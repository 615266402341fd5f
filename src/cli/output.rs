//! Output formatting utilities

use crate::application::{ReplaceOutcome, UpdateOutcome};
use crate::domain::tags::ValidationReport;
use crate::domain::{FileTagRecord, TagInfo};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DRY_RUN_BANNER: &str = "DRY RUN MODE - No files will be modified";

/// Show a path relative to the vault root when it lies inside it
pub fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Format the result of `find`
pub fn format_find_results(found: &BTreeMap<String, Vec<PathBuf>>, root: &Path) -> String {
    let mut output = String::new();
    for (tag, files) in found {
        if files.is_empty() {
            output.push_str(&format!("#{}: no files\n", tag));
            continue;
        }
        output.push_str(&format!("#{} ({} files)\n", tag, files.len()));
        for file in files {
            output.push_str(&format!("  {}\n", display_path(file, root)));
        }
    }
    output
}

/// Format per-tag usage with file lists
pub fn format_tag_info(infos: &[TagInfo], root: &Path) -> String {
    if infos.is_empty() {
        return "No tags found".to_string();
    }

    let mut output = String::new();
    for info in infos {
        output.push_str(&format!("#{}  {} files\n", info.name, info.count));
        for file in &info.files {
            output.push_str(&format!("  {}\n", display_path(file, root)));
        }
    }
    output
}

/// Format a list of tags for display.
pub fn format_tag_list(infos: &[TagInfo]) -> String {
    if infos.is_empty() {
        return "No tags found".to_string();
    }

    let mut output = String::new();
    for info in infos {
        output.push_str(&format!("#{}  {} files\n", info.name, info.count));
    }
    output
}

pub fn format_untagged(paths: &[PathBuf], root: &Path) -> String {
    if paths.is_empty() {
        return "No untagged files found".to_string();
    }

    let mut output = String::new();
    for path in paths {
        output.push_str(&format!("{}\n", display_path(path, root)));
    }
    output
}

pub fn format_file_tags(records: &[FileTagRecord]) -> String {
    let mut output = String::new();
    for record in records {
        if record.tags.is_empty() {
            output.push_str(&format!("{}: (no tags)\n", record.path.display()));
        } else {
            let tags: Vec<String> = record.tags.iter().map(|t| format!("#{}", t)).collect();
            output.push_str(&format!("{}: {}\n", record.path.display(), tags.join(" ")));
        }
    }
    output
}

pub fn format_validation(reports: &BTreeMap<String, ValidationReport>) -> String {
    let mut output = String::new();
    for (tag, report) in reports {
        if report.is_valid {
            output.push_str(&format!("{}: valid\n", tag));
            continue;
        }
        output.push_str(&format!("{}: invalid\n", tag));
        for issue in &report.issues {
            output.push_str(&format!("  • {}\n", issue));
        }
        for suggestion in &report.suggestions {
            output.push_str(&format!("  → {}\n", suggestion));
        }
    }
    output
}

pub fn format_replace_outcome(outcome: &ReplaceOutcome, root: &Path) -> String {
    let mut output = String::new();
    if outcome.dry_run {
        output.push_str(&format!("{}\n\n", DRY_RUN_BANNER));
    }

    if outcome.modified_files.is_empty() {
        output.push_str("No files changed\n");
    } else {
        let verb = if outcome.dry_run { "Would modify" } else { "Modified" };
        output.push_str(&format!("{} {} files:\n", verb, outcome.modified_files.len()));
        for file in &outcome.modified_files {
            output.push_str(&format!("  {}\n", display_path(file, root)));
        }
    }

    if !outcome.errors.is_empty() {
        output.push_str(&format!("Failed {} files:\n", outcome.failed_files.len()));
        for error in &outcome.errors {
            output.push_str(&format!("  {}\n", error));
        }
    }
    if outcome.cancelled {
        output.push_str("Cancelled before all files were processed\n");
    }
    output
}

pub fn format_update_outcome(outcome: &UpdateOutcome) -> String {
    let mut output = String::new();
    if outcome.dry_run {
        output.push_str(&format!("{}\n\n", DRY_RUN_BANNER));
    }

    let verb = if outcome.dry_run { "Would modify" } else { "Modified" };
    output.push_str(&format!("{} {} files\n", verb, outcome.modified_files.len()));
    for file in &outcome.modified_files {
        output.push_str(&format!("  {}\n", file.display()));
    }

    if !outcome.files_migrated.is_empty() {
        output.push_str(&format!(
            "Migrated leading hashtags in {} files\n",
            outcome.files_migrated.len()
        ));
    }
    write_counts(&mut output, "Tags added", &outcome.tags_added);
    write_counts(&mut output, "Tags removed", &outcome.tags_removed);

    if !outcome.errors.is_empty() {
        output.push_str("Errors:\n");
        for error in &outcome.errors {
            output.push_str(&format!("  {}\n", error));
        }
    }
    if outcome.cancelled {
        output.push_str("Cancelled before all files were processed\n");
    }
    output
}

fn write_counts(output: &mut String, heading: &str, counts: &BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    output.push_str(&format!("{}:\n", heading));
    for (tag, count) in counts {
        output.push_str(&format!("  #{}  {} files\n", tag, count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_format_empty_tag_list() {
        let output = format_tag_list(&[]);
        assert_eq!(output, "No tags found");
    }

    #[test]
    fn test_format_tag_list() {
        let infos = vec![
            TagInfo::new("work".to_string(), vec![PathBuf::from("a"), PathBuf::from("b")]),
            TagInfo::new("personal".to_string(), vec![PathBuf::from("a")]),
        ];
        let output = format_tag_list(&infos);
        assert_eq!(output, "#work  2 files\n#personal  1 files\n");
    }

    #[test]
    fn test_find_results_relative_to_root() {
        let mut found = BTreeMap::new();
        found.insert(
            "golang".to_string(),
            vec![PathBuf::from("/vault/notes/a.md")],
        );
        found.insert("missing".to_string(), vec![]);

        let output = format_find_results(&found, Path::new("/vault"));
        assert_eq!(output, "#golang (1 files)\n  notes/a.md\n#missing: no files\n");
    }

    #[test]
    fn test_file_tags() {
        let records = vec![
            FileTagRecord::new(
                PathBuf::from("/v/a.md"),
                BTreeSet::from(["rust".to_string(), "golang".to_string()]),
            ),
            FileTagRecord::new(PathBuf::from("/v/b.md"), BTreeSet::new()),
        ];
        assert_eq!(
            format_file_tags(&records),
            "/v/a.md: #golang #rust\n/v/b.md: (no tags)\n"
        );
    }

    #[test]
    fn test_dry_run_banner() {
        let outcome = ReplaceOutcome {
            dry_run: true,
            modified_files: vec![PathBuf::from("/v/a.md")],
            ..ReplaceOutcome::default()
        };
        let output = format_replace_outcome(&outcome, Path::new("/v"));
        assert!(output.starts_with(DRY_RUN_BANNER));
        assert!(output.contains("Would modify 1 files:\n  a.md"));
    }

    #[test]
    fn test_update_outcome_lists_errors() {
        let mut outcome = UpdateOutcome::default();
        outcome.errors.push("bad.md: malformed frontmatter".to_string());
        outcome.tags_added.insert("alpha".to_string(), 2);

        let output = format_update_outcome(&outcome);
        assert!(output.contains("Modified 0 files"));
        assert!(output.contains("Tags added:\n  #alpha  2 files"));
        assert!(output.contains("Errors:\n  bad.md: malformed frontmatter"));
    }

    #[test]
    fn test_update_outcome_dry_run_with_migration() {
        let outcome = UpdateOutcome {
            dry_run: true,
            modified_files: vec![PathBuf::from("note.md")],
            files_migrated: vec![PathBuf::from("note.md")],
            ..UpdateOutcome::default()
        };

        assert_eq!(
            format_update_outcome(&outcome),
            format!(
                "{}\n\nWould modify 1 files\n  note.md\nMigrated leading hashtags in 1 files\n",
                DRY_RUN_BANNER
            )
        );
    }
}
