//! Resolution of per-slice ROI, magnitude, and contrast image paths
//!
//! The vendor processing tool records image paths in the `.alc2` digest
//! as they existed on the machine that ran it. This module maps those
//! recorded paths back onto the local filesystem, reads the reference
//! SliceLocation from each slice's magnitude image, and pairs every
//! slice with the inversion-output contrast files at the same location.

use crate::digest::{is_alc2_digest, Digest};
use crate::error::{ElastokitError, Result};
use crate::paths::{normalize, sorted_files, sorted_subdirs, split_tail};
use crate::tags::{get_float_value, open_dicom_meta, SLICE_LOCATION};
use crate::types::{Contrast, SliceData, SliceRecord};
use log::warn;
use std::path::{Path, PathBuf};

// Digest keys written by the vendor processing tool
const ROI_SLICE_PREFIX: &str = "mre.roi.slice.";
const MAG_SLICE_PREFIX: &str = "mre.mag.slice.";
const MAG_SERIES_KEY: &str = "mre.mag.seriesNumber";

/// Directory overrides for [`locate_slice_data`]
#[derive(Debug, Clone, Default)]
pub struct LocatorOptions {
    /// Directory holding the ROI files; defaults to the digest's directory
    pub temp_dir: Option<PathBuf>,

    /// Inversion output directory; defaults to the `3dmmdi` folder two or
    /// three levels above the digest
    pub inversion_dir: Option<PathBuf>,
}

/// Builds the slice table for a case from its `.alc2` digest
///
/// Every `mre.roi.slice.<N>` key yields one [`SliceRecord`]. Slices whose
/// magnitude image cannot be found keep an empty contrast table rather
/// than failing the whole case.
///
/// # Errors
///
/// Returns an error if the digest path is invalid, the digest cannot be
/// read, or a configured directory does not exist
pub fn locate_slice_data(digest_path: &Path, options: &LocatorOptions) -> Result<SliceData> {
    if !is_alc2_digest(digest_path) {
        return Err(ElastokitError::InvalidDigest(format!(
            "{} does not have .alc2 extension",
            digest_path.display()
        )));
    }
    if !digest_path.exists() {
        return Err(ElastokitError::InvalidDigest(format!(
            "{} does not exist",
            digest_path.display()
        )));
    }
    if !digest_path.is_file() {
        return Err(ElastokitError::InvalidDigest(format!(
            "{} is not a file",
            digest_path.display()
        )));
    }
    let digest = Digest::parse(digest_path)?;

    let temp_dir = match &options.temp_dir {
        Some(dir) => {
            if !dir.is_dir() {
                return Err(ElastokitError::DirectoryNotFound(
                    dir.display().to_string(),
                ));
            }
            dir.clone()
        }
        None => digest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let inversion_dir = match &options.inversion_dir {
        Some(dir) => {
            if !dir.is_dir() {
                return Err(ElastokitError::DirectoryNotFound(
                    dir.display().to_string(),
                ));
            }
            dir.clone()
        }
        None => default_inversion_dir(digest_path)?,
    };

    let mut slice_data = SliceData::new();
    for (key, value) in digest.content.iter() {
        let Some(slice_number) = key.strip_prefix(ROI_SLICE_PREFIX) else {
            continue;
        };
        let roi_name = normalize(value)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut record = SliceRecord::new(slice_number, temp_dir.join(roi_name));

        // Any mre.mag.slice.<N> key may supply the reference location
        let mag_prefix = format!("{}{}", MAG_SLICE_PREFIX, slice_number);
        for (mag_key, mag_value) in digest.content.iter() {
            if !mag_key.starts_with(&mag_prefix) {
                continue;
            }
            record.slice_location = find_slice_location(mag_value, &inversion_dir, &temp_dir);
            if record.slice_location.is_some() {
                break;
            }
        }
        if record.slice_location.is_none() {
            warn!(
                "No SliceLocation found for slice {} in {}",
                slice_number,
                digest_path.display()
            );
        }

        slice_data.insert(slice_number.to_string(), record);
    }

    let Some(mag_series) = digest.get(MAG_SERIES_KEY) else {
        warn!(
            "No {} key in {}, contrast paths left empty",
            MAG_SERIES_KEY,
            digest_path.display()
        );
        return Ok(slice_data);
    };

    let parent_dir = contrast_parent_dir(&inversion_dir, mag_series);
    for record in slice_data.values_mut() {
        let Some(target) = record.slice_location else {
            continue;
        };
        for contrast in Contrast::ALL {
            let Some(code) = contrast.dir_code() else {
                continue;
            };
            'dirs: for dir in matching_contrast_dirs(&parent_dir, mag_series, code) {
                for file in sorted_files(&dir).unwrap_or_default() {
                    let Ok(dcm) = open_dicom_meta(&file) else {
                        continue;
                    };
                    // Exact match, locations are copied verbatim between outputs
                    if get_float_value(&dcm, SLICE_LOCATION) == Some(target) {
                        record.contrast_paths.insert(contrast, file);
                        break 'dirs;
                    }
                }
            }
        }
    }

    Ok(slice_data)
}

/// Finds the `3dmmdi` folder for a digest, checking the current layout
/// before the legacy two-level one
fn default_inversion_dir(digest_path: &Path) -> Result<PathBuf> {
    let candidates = [
        split_tail(digest_path, 3).0.join("3dmmdi"),
        split_tail(digest_path, 2).0.join("3dmmdi"),
    ];
    for candidate in &candidates {
        if candidate.is_dir() {
            return Ok(candidate.clone());
        }
    }
    Err(ElastokitError::DirectoryNotFound(format!(
        "no 3dmmdi inversion directory found near {}",
        digest_path.display()
    )))
}

/// Reads SliceLocation from the first resolvable layout of a recorded
/// magnitude path
fn find_slice_location(recorded: &str, inversion_dir: &Path, temp_dir: &Path) -> Option<f64> {
    let recorded = normalize(recorded);
    let candidates = [
        inversion_dir.join(split_tail(&recorded, 3).1),
        inversion_dir.join(split_tail(&recorded, 2).1),
        split_tail(temp_dir, 2).0.join(split_tail(&recorded, 2).1),
    ];
    for candidate in &candidates {
        let Ok(dcm) = open_dicom_meta(candidate) else {
            continue;
        };
        if let Some(location) = get_float_value(&dcm, SLICE_LOCATION) {
            return Some(location);
        }
    }
    None
}

/// Picks the directory whose subfolders hold the contrast series
fn contrast_parent_dir(inversion_dir: &Path, mag_series: &str) -> PathBuf {
    let folders = sorted_subdirs(inversion_dir).unwrap_or_default();
    if folders.iter().any(|folder| folder == mag_series) {
        return inversion_dir.join(mag_series);
    }
    for folder in &folders {
        if mag_series.starts_with(folder.as_str()) {
            return inversion_dir.join(folder);
        }
    }
    inversion_dir.to_path_buf()
}

/// Lists `s<middle><code>` folders whose middle segment starts the
/// magnitude series number
fn matching_contrast_dirs(parent_dir: &Path, mag_series: &str, code: &str) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for folder in sorted_subdirs(parent_dir).unwrap_or_default() {
        let Some(stem) = folder.strip_prefix('s') else {
            continue;
        };
        let Some(middle) = stem.strip_suffix(code) else {
            continue;
        };
        if mag_series.starts_with(middle) {
            dirs.push(parent_dir.join(folder));
        }
    }
    dirs
}
