//! Source layout checks.
//!
//! Component: the crate's own sources
//!
//! These tests verify:
//! - No source line is wider than rustfmt's default 100 columns

#![cfg(test)]

use std::fs;
use std::path::{Path, PathBuf};

const MAX_WIDTH: usize = 100;

fn rust_files(dir: &Path, found: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            rust_files(&path, found);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            found.push(path);
        }
    }
}

#[test]
fn source_lines_fit_rustfmt_width() {
    // Arrange
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut files = Vec::new();
    rust_files(&root.join("src"), &mut files);
    rust_files(&root.join("tests"), &mut files);

    // Act
    let mut wide = Vec::new();
    for file in &files {
        let text = fs::read_to_string(file).unwrap();
        for (n, line) in text.lines().enumerate() {
            if line.chars().count() > MAX_WIDTH {
                wide.push(format!("{}:{}", file.display(), n + 1));
            }
        }
    }

    // Assert
    assert!(!files.is_empty());
    assert!(wide.is_empty(), "lines over {MAX_WIDTH} columns: {wide:#?}");
}
