//! Lexical path manipulation and composite path recovery
//!
//! Digests record image paths as they were on the machine that wrote
//! them. Once a case directory is copied or archived those paths go
//! stale, so the helpers here recombine recorded path tails with the
//! digest's current location to find where the files live now.

use log::warn;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Normalizes a path to forward-slash form
///
/// Converts backslash separators, collapses repeated separators and `.`
/// segments, resolves `..` lexically, and reduces a doubled leading
/// separator to a single root. Purely lexical; the path does not need
/// to exist. An empty input normalizes to `.`.
pub fn normalize<P: AsRef<Path>>(path: P) -> PathBuf {
    let raw = path.as_ref().to_string_lossy().replace('\\', "/");
    let absolute = raw.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for part in raw.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // `..` above an absolute root stays at the root
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let mut out = PathBuf::new();
    if absolute {
        out.push(MAIN_SEPARATOR.to_string());
    }
    for part in parts {
        out.push(part);
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Counts path segments, excluding the filesystem root
pub fn count_elements<P: AsRef<Path>>(path: P) -> usize {
    normalize(path)
        .components()
        .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
        .count()
}

/// Splits off the last `n` segments of a path
///
/// Returns the remaining head and the removed segments rejoined as a
/// relative tail, so `split_tail("/a/b/c", 2)` gives `("/a", "b/c")`.
/// With `n == 0` the whole normalized path is the head; when `n` exceeds
/// the segment count the head shrinks to the root (or empty for a
/// relative path).
pub fn split_tail<P: AsRef<Path>>(path: P, n: usize) -> (PathBuf, String) {
    let normalized = normalize(path);
    if n == 0 {
        return (normalized, String::new());
    }

    let mut head = normalized;
    let mut parts: Vec<String> = Vec::new();
    for _ in 0..n {
        match head.file_name() {
            Some(name) => {
                parts.push(name.to_string_lossy().into_owned());
                head.pop();
            }
            None => break,
        }
    }
    parts.reverse();
    (head, parts.join("/"))
}

/// Finds an existing path combining a head of `primary` with a tail of
/// `secondary`
///
/// Tails of `secondary` are tried shortest first; for each tail, heads
/// of `primary` are tried longest first. The first combination present
/// on disk wins, which keeps as much of the recorded path's suffix as
/// can be re-anchored under the digest's own directory tree.
pub fn find_existing_composite<P: AsRef<Path>, Q: AsRef<Path>>(
    primary: P,
    secondary: Q,
) -> Option<PathBuf> {
    let primary = normalize(primary);
    let secondary = normalize(secondary);

    for j in 1..=count_elements(&secondary) {
        let (_, tail) = split_tail(&secondary, j);
        for i in 1..=count_elements(&primary) {
            let (head, _) = split_tail(&primary, i);
            let candidate = head.join(&tail);
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }

    warn!(
        "No existing composite path found for {} and {}",
        primary.display(),
        secondary.display()
    );
    None
}

/// Lists the immediate subdirectory names of a directory, sorted
pub(crate) fn sorted_subdirs(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Lists the files directly inside a directory, sorted
pub(crate) fn sorted_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
