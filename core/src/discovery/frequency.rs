use crate::paths::{sorted_files, sorted_subdirs};
use crate::tags::{get_string_value, open_dicom_meta, SERIES_DESCRIPTION};
use log::{info, warn};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Driver frequency assumed when none is recorded, in Hz
pub const DEFAULT_FREQUENCY_HZ: u32 = 60;

static TRAILING_DIGITS_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_trailing_digits_regex() -> &'static Regex {
    TRAILING_DIGITS_REGEX.get_or_init(|| {
        Regex::new(r"(\d+)\s*$").expect("Invalid trailing digits regex")
    })
}

/// Detects the MRE driver frequency for an acquisition
///
/// Reads the first parseable DICOM found under `search_dir` (walking
/// subfolders in sorted order) and parses its SeriesDescription. Falls
/// back to 60 Hz when nothing usable is found.
pub fn detect_frequency<P: AsRef<Path>>(search_dir: P) -> u32 {
    let search_dir = search_dir.as_ref();
    let Some(description) = first_series_description(search_dir) else {
        warn!(
            "No readable DICOM under {}, assuming {}Hz",
            search_dir.display(),
            DEFAULT_FREQUENCY_HZ
        );
        return DEFAULT_FREQUENCY_HZ;
    };
    let Some(frequency) = frequency_from_description(&description) else {
        warn!(
            "No frequency marker in series description {:?}, assuming {}Hz",
            description, DEFAULT_FREQUENCY_HZ
        );
        return DEFAULT_FREQUENCY_HZ;
    };
    info!("Found mmdi3d frequency {}Hz", frequency);
    frequency
}

/// Parses a driver frequency out of a series description
///
/// The description is lowercased with dashes and underscores removed;
/// the digits immediately before the first "hz" are the frequency.
/// Returns `None` when no "hz" marker or no digits precede it.
pub fn frequency_from_description(description: &str) -> Option<u32> {
    let normalized = description.to_lowercase().replace(['-', '_'], "");
    let (prefix, _) = normalized.split_once("hz")?;
    let captures = get_trailing_digits_regex().captures(prefix)?;
    captures.get(1)?.as_str().parse().ok()
}

/// Finds the SeriesDescription of the first parseable DICOM under a
/// directory
///
/// The first parseable file decides; a missing description on it reads
/// as empty rather than moving on to the next file.
fn first_series_description(dir: &Path) -> Option<String> {
    for file in sorted_files(dir).ok()? {
        if let Ok(dcm) = open_dicom_meta(&file) {
            return Some(get_string_value(&dcm, SERIES_DESCRIPTION).unwrap_or_default());
        }
    }
    for sub in sorted_subdirs(dir).ok()? {
        if let Some(description) = first_series_description(&dir.join(sub)) {
            return Some(description);
        }
    }
    None
}
