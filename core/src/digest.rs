//! Digest parsing and digest-adjacent file handling
//!
//! A digest is a flat `key = value` manifest written next to a processed
//! case, with `%` starting a trailing comment. Processing reruns keep
//! preserved copies of the first digest in the same directory, which
//! [`original_digest`] knows how to find.

use crate::error::{ElastokitError, Result};
use crate::paths::normalize;
use log::warn;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed digest document
///
/// `content` holds the key-value assignments with later duplicates
/// overwriting earlier ones; `comments` collects the trimmed text of
/// every `%` comment encountered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Digest {
    pub content: BTreeMap<String, String>,
    pub comments: HashSet<String>,
}

impl Digest {
    /// Parses a digest file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse_str(&text))
    }

    /// Parses digest text
    ///
    /// Each line is split once on the first `%`, with the remainder
    /// stored as a comment, then once on the first `=`. Keys and values
    /// are trimmed. Lines without `=` contribute no key and are not an
    /// error.
    pub fn parse_str(text: &str) -> Self {
        let mut digest = Digest::default();
        for line in text.lines() {
            if line.is_empty() || line == " " {
                continue;
            }
            let data = match line.split_once('%') {
                Some((data, comment)) => {
                    digest.comments.insert(comment.trim().to_string());
                    data
                }
                None => line,
            };
            if let Some((key, value)) = data.split_once('=') {
                digest
                    .content
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        digest
    }

    /// Looks up a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.content.get(key).map(|s| s.as_str())
    }
}

/// Checks for the alc2 digest extension, case-insensitively
pub fn is_alc2_digest<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("alc2"))
        .unwrap_or(false)
}

/// Extracts the series information at the end of a digest file name
///
/// Digest names carry four fixed underscore-separated components before
/// the series information and an `.alc` style extension after it.
/// Returns `None` (with a warning) for names without `.alc`.
pub fn series_suffix<P: AsRef<Path>>(digest_path: P) -> Option<String> {
    let path = normalize(&digest_path);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !name.contains(".alc") {
        warn!(
            "Digest name {} does not contain '.alc', no series suffix",
            path.display()
        );
        return None;
    }
    let joined = name.split('_').skip(4).collect::<Vec<_>>().join("_");
    Some(joined.split(".alc").next().unwrap_or_default().to_string())
}

/// Finds the earliest preserved revision of an alc2 digest
///
/// Reruns rename the first digest to `<name>_01`, or keep timestamped
/// copies with a fixed-width suffix. The `_01` copy wins, then the
/// earliest timestamped copy, else the digest itself.
///
/// # Errors
///
/// Returns an error if `digest_path` is not an alc2 digest or its
/// directory cannot be listed
pub fn original_digest<P: AsRef<Path>>(digest_path: P) -> Result<PathBuf> {
    let digest_path = normalize(&digest_path);
    if !is_alc2_digest(&digest_path) {
        return Err(ElastokitError::InvalidDigest(format!(
            "{} is not an alc2 digest",
            digest_path.display()
        )));
    }

    let digest_dir = digest_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = match digest_path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => {
            return Err(ElastokitError::InvalidDigest(format!(
                "{} has no file name",
                digest_path.display()
            )))
        }
    };

    let mut siblings: Vec<String> = Vec::new();
    for entry in fs::read_dir(digest_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(&file_name) {
            siblings.push(name);
        }
    }

    let preferred = format!("{}_01", file_name);
    if siblings.iter().any(|name| name == &preferred) {
        return Ok(digest_dir.join(preferred));
    }

    // Timestamped copies append a fixed 16-character suffix to the name
    let mut timestamped: Vec<&String> = siblings
        .iter()
        .filter(|name| name.len() == file_name.len() + 16)
        .collect();
    timestamped.sort();
    match timestamped.first() {
        Some(name) => Ok(digest_dir.join(name.as_str())),
        None => Ok(digest_path),
    }
}

/// Saves a digest's key-value content next to it as JSON
///
/// The output is named `<stem>_<extension>.json`, so `case.alc2`
/// produces `case_alc2.json` in the same directory. Returns the path
/// written.
///
/// # Errors
///
/// Returns an error if the path does not carry an `.alc` style
/// extension, or reading or writing fails
#[cfg(feature = "json")]
pub fn save_digest_json<P: AsRef<Path>>(digest_path: P) -> Result<PathBuf> {
    let digest_path = normalize(&digest_path);
    let ext = digest_path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !ext.to_lowercase().starts_with("alc") {
        return Err(ElastokitError::InvalidDigest(format!(
            "{} is not an alc digest, no JSON file saved",
            digest_path.display()
        )));
    }

    let digest = Digest::parse(&digest_path)?;
    let json = serde_json::to_string_pretty(&digest.content)
        .map_err(|e| ElastokitError::JsonError(format!("{}", e)))?;

    let stem = digest_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let json_path = digest_path.with_file_name(format!("{}_{}.json", stem, ext));
    fs::write(&json_path, json)?;
    Ok(json_path)
}
