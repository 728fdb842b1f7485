//! Input discovery from a working directory.
//!
//! Scans one directory (not recursive) for regular files whose name
//! matches a shell-style wildcard pattern. An empty result is a normal
//! outcome: the caller simply has no work to do.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Find input files in `dir` whose file name matches `pattern`.
///
/// Supports `*` (any run of characters) and `?` (one character).
/// Hidden files are skipped unless the pattern itself starts with `.`.
/// Results are sorted by file name so runs are repeatable.
pub fn discover_inputs(dir: &Path, pattern: &str) -> io::Result<Vec<PathBuf>> {
    let include_hidden = pattern.starts_with('.');
    let mut names = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            tracing::warn!(
                "Skipping non UTF-8 file name: {}",
                entry.path().display()
            );
            continue;
        };

        if name.starts_with('.') && !include_hidden {
            continue;
        }
        if !wildcard_match(pattern, name) {
            continue;
        }
        // Follows symlinks, so a link to a file counts as a file
        if !entry.path().is_file() {
            continue;
        }

        names.push(name.to_string());
    }

    names.sort();

    tracing::debug!(
        "Discovered {} input(s) matching '{}' in {}",
        names.len(),
        pattern,
        dir.display()
    );

    Ok(names.into_iter().map(|name| dir.join(name)).collect())
}

/// Match a file name against a `*`/`?` wildcard pattern.
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    let (mut p, mut n) = (0, 0);
    // Position of the last `*` seen, and where in `name` it started matching
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == name[n]) {
            p += 1;
            n += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, n));
            p += 1;
        } else if let Some((star, start)) = backtrack {
            p = star + 1;
            n = start + 1;
            backtrack = Some((star, start + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"not really a video").unwrap();
    }

    #[test]
    fn wildcard_basics() {
        assert!(wildcard_match("*.mp4", "A.mp4"));
        assert!(wildcard_match("*.mp4", ".mp4"));
        assert!(!wildcard_match("*.mp4", "A.mp4.part"));
        assert!(!wildcard_match("*.mp4", "A.MP4"));
        assert!(wildcard_match("clip_??.mp4", "clip_01.mp4"));
        assert!(!wildcard_match("clip_??.mp4", "clip_1.mp4"));
        assert!(wildcard_match("*", "anything"));
        assert!(wildcard_match("a*b*c", "aXXbYYc"));
        assert!(!wildcard_match("a*b*c", "aXXbYY"));
        assert!(wildcard_match("exact.mp4", "exact.mp4"));
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let dir = tempdir().unwrap();
        let found = discover_inputs(dir.path(), "*.mp4").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn finds_matches_in_name_order() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "B.mp4");
        touch(dir.path(), "A.mp4");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), ".hidden.mp4");
        fs::create_dir(dir.path().join("folder.mp4")).unwrap();

        let found = discover_inputs(dir.path(), "*.mp4").unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("A.mp4"), dir.path().join("B.mp4")]
        );
    }

    #[test]
    fn hidden_files_need_explicit_pattern() {
        let dir = tempdir().unwrap();
        touch(dir.path(), ".hidden.mp4");

        let found = discover_inputs(dir.path(), ".*.mp4").unwrap();
        assert_eq!(found, vec![dir.path().join(".hidden.mp4")]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(discover_inputs(&dir.path().join("gone"), "*.mp4").is_err());
    }
}
