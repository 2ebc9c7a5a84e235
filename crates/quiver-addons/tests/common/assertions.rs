//! Assertion helpers for addon lifecycle testing

#![allow(dead_code)]

use quiver_addons::{AddonError, ErrorKind};
use std::path::Path;

/// Assert an operation failed with the given error kind
pub fn assert_kind<T: std::fmt::Debug>(result: Result<T, AddonError>, expected: ErrorKind) {
    match result {
        Ok(value) => panic!("expected {} but got Ok({:?})", expected, value),
        Err(e) => assert_eq!(
            e.kind(),
            expected,
            "expected {} but got {}: {}",
            expected,
            e.kind(),
            e
        ),
    }
}

/// Assert two directory trees hold the same files with the same content
pub fn assert_same_tree(left: &Path, right: &Path) {
    let files = |root: &Path| -> Vec<(String, Vec<u8>)> {
        let mut files: Vec<_> = walkdir::WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let rel = e
                    .path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .to_string();
                (rel, std::fs::read(e.path()).unwrap())
            })
            .collect();
        files.sort();
        files
    };

    assert_eq!(
        files(left),
        files(right),
        "{} and {} differ",
        left.display(),
        right.display()
    );
}
