#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;

pub fn tagmend_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tagmend").unwrap();
    cmd.env_remove("TAGMEND_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write a note, creating parent directories as needed
pub fn write_note(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A small vault with hashtags, both frontmatter forms and excluded paths
pub fn sample_vault(root: &Path) {
    write_note(root, "golang.md", "# Go\n#golang #programming\n");
    write_note(
        root,
        "python.md",
        "---\ntags: [python, programming]\n---\n# Python\n",
    );
    write_note(
        root,
        "notes/rust.md",
        "---\ntags:\n  - rust\n  - Programming\n---\nSee #golang too.\n",
    );
    write_note(root, "plain.md", "# Plain\nColor #ff0000 and issue #12345.\n");
    write_note(root, "board.excalidraw.md", "#diagram");
    write_note(root, "100 Archive/old.md", "#archived");
}
