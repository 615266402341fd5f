//! Integration tests for the update command

#![allow(deprecated)]

use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

mod common;
use common::{tagmend_cmd, write_note};

fn read(temp: &TempDir, name: &str) -> String {
    fs::read_to_string(temp.path().join(name)).unwrap()
}

#[test]
fn test_update_adds_tags_and_preserves_fields() {
    let temp = TempDir::new().unwrap();
    write_note(
        temp.path(),
        "note.md",
        "---\ntitle: \"Important Title\"\ntags: [\"existing\"]\nauthor: Test Author\n---\n# Body\n",
    );

    tagmend_cmd()
        .args(["update", "--files", "note.md", "--add", "new-tag", "--root"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Modified 1 files"))
        .stdout(predicate::str::contains("#new-tag  1 files"));

    assert_eq!(
        read(&temp, "note.md"),
        "---\ntitle: Important Title\ntags:\n- existing\n- new-tag\nauthor: Test Author\n---\n# Body\n"
    );
}

#[test]
fn test_update_twice_is_idempotent() {
    let temp = TempDir::new().unwrap();
    write_note(temp.path(), "note.md", "# Title\n");

    for _ in 0..2 {
        tagmend_cmd()
            .args(["update", "--files", "note.md", "--add", "alpha", "--root"])
            .arg(temp.path())
            .assert()
            .success();
    }

    let output = tagmend_cmd()
        .args(["update", "--files", "note.md", "--add", "alpha", "--json", "--root"])
        .arg(temp.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let outcome: Value = serde_json::from_slice(&output).unwrap();
    assert!(outcome["tags_added"].as_object().unwrap().is_empty());
    assert!(outcome["modified_files"].as_array().unwrap().is_empty());

    assert_eq!(read(&temp, "note.md"), "---\ntags:\n- alpha\n---\n# Title\n");
}

#[test]
fn test_update_conflicting_lists_fail_before_io() {
    let temp = TempDir::new().unwrap();
    write_note(temp.path(), "note.md", "# Title\n");

    tagmend_cmd()
        .args(["update", "--files", "note.md", "--add", "X", "--remove", "x", "--root"])
        .arg(temp.path())
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains(
            "No operations remain after conflict resolution",
        ));

    assert_eq!(read(&temp, "note.md"), "# Title\n");
}

#[test]
fn test_update_migrates_leading_hashtags() {
    let temp = TempDir::new().unwrap();
    write_note(
        temp.path(),
        "note.md",
        "#tag1 #tag2 #tag3\n# Document Title\nContent with #body-tag\n",
    );

    tagmend_cmd()
        .args(["update", "--files", "note.md", "--root"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Migrated leading hashtags in 1 files"));

    assert_eq!(
        read(&temp, "note.md"),
        "---\ntags:\n- tag1\n- tag2\n- tag3\n---\n# Document Title\nContent with #body-tag\n"
    );
}

#[test]
fn test_update_removes_tags_from_frontmatter_and_body() {
    let temp = TempDir::new().unwrap();
    write_note(
        temp.path(),
        "note.md",
        "---\ntags:\n  - keep\n  - body-tag\n---\nThis has #body-tag and #another-body-tag.\n",
    );

    tagmend_cmd()
        .args(["update", "--files", "note.md", "--remove", "#body-tag", "--root"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Tags removed:\n  #body-tag  1 files"));

    assert_eq!(
        read(&temp, "note.md"),
        "---\ntags:\n- keep\n---\nThis has  and #another-body-tag.\n"
    );
}

#[test]
fn test_update_records_per_file_errors_and_continues() {
    let temp = TempDir::new().unwrap();
    write_note(temp.path(), "bad.md", "---\ntags: [unclosed\n---\nBody\n");
    write_note(temp.path(), "good.md", "Body\n");

    tagmend_cmd()
        .args([
            "update",
            "--files",
            "bad.md,../outside.md,good.md",
            "--add",
            "reviewed",
            "--root",
        ])
        .arg(temp.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Modified 1 files\n  good.md"))
        .stdout(predicate::str::contains("bad.md: malformed frontmatter"))
        .stdout(predicate::str::contains("../outside.md: Invalid path"));

    assert_eq!(read(&temp, "good.md"), "---\ntags:\n- reviewed\n---\nBody\n");
    assert_eq!(read(&temp, "bad.md"), "---\ntags: [unclosed\n---\nBody\n");
}

#[test]
fn test_update_dry_run() {
    let temp = TempDir::new().unwrap();
    write_note(temp.path(), "note.md", "Body\n");

    tagmend_cmd()
        .args(["update", "--files", "note.md", "--add", "alpha", "--dry-run", "--root"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "DRY RUN MODE - No files will be modified",
        ))
        .stdout(predicate::str::contains("Would modify 1 files"));

    assert_eq!(read(&temp, "note.md"), "Body\n");
}
