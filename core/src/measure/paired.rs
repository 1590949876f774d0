use crate::digest::Digest;
use crate::error::{ElastokitError, Result};
use crate::measure::stack::ImageStack;
use crate::measure::stats::{percentile_of, summarize};
use crate::paths::find_existing_composite;
use crate::tags::{
    get_float_value, get_string_value, open_dicom_meta, IMAGE_COMMENTS, RESCALE_INTERCEPT,
    RESCALE_SLOPE,
};
use crate::types::ContrastMeasurement;
use log::warn;
use ndarray::Array2;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// Digest key families for the paired 2D measurements
const ROI_KEY_PREFIX: &str = "mre.roi.";
const ELASTOGRAM_KEY_PREFIX: &str = "mre.stiff.";
const FW_ROI_KEY_PREFIX: &str = "fw.roi.";
const FAT_FRACTION_KEY_PREFIX: &str = "fw.ffrac.";

// Fixed rescale convention some fat-fraction series state in ImageComments
const GRAY_VALUE_COMMENT: &str = "Gray value 1 equals 0.1%";

/// Collects digest keys with a given prefix and `.dcm` values, resolved
/// to their current location on disk
///
/// # Errors
///
/// Returns an error if a recorded path cannot be re-anchored anywhere
/// under the digest's directory tree
pub fn dcm_paths_from_digest(
    digest_path: &Path,
    digest: &Digest,
    key_start: &str,
) -> Result<BTreeMap<String, PathBuf>> {
    let mut paths = BTreeMap::new();
    for (key, value) in digest.content.iter() {
        if !key.starts_with(key_start) || !value.to_lowercase().ends_with(".dcm") {
            continue;
        }
        match find_existing_composite(digest_path, value) {
            Some(path) => {
                paths.insert(key.clone(), path);
            }
            None => {
                return Err(ElastokitError::CompositeNotFound(
                    value.clone(),
                    digest_path.display().to_string(),
                ));
            }
        }
    }
    Ok(paths)
}

/// Elastogram pixel values under the ROI masks recorded in a digest
///
/// An empty result means no ROI key had a matching elastogram key.
pub fn roi_elastogram_values(digest_path: &Path) -> Result<Vec<f64>> {
    let digest = Digest::parse(digest_path)?;
    let rois = dcm_paths_from_digest(digest_path, &digest, ROI_KEY_PREFIX)?;
    let images = dcm_paths_from_digest(digest_path, &digest, ELASTOGRAM_KEY_PREFIX)?;
    let (roi_paths, image_paths) =
        pair_by_suffix(&rois, ROI_KEY_PREFIX, &images, ELASTOGRAM_KEY_PREFIX, "elastogram");
    if roi_paths.is_empty() {
        warn!(
            "No paired ROI and elastogram images in {}",
            digest_path.display()
        );
        return Ok(Vec::new());
    }

    let roi = ImageStack::load(&roi_paths)?.binarized();
    let image = ImageStack::load(&image_paths)?;
    Ok(masked_values(&roi, &image))
}

/// Fat-fraction pixel values under the ROI masks recorded in a digest
///
/// Each fat-fraction plane is rescaled to percent units from its own
/// DICOM tags before the masks are applied. When the ROI grid is an
/// exact integer multiple of the fat-fraction grid, the fat-fraction
/// stack is block-replicated up to the ROI grid.
pub fn roi_fat_fraction_values(digest_path: &Path) -> Result<Vec<f64>> {
    let digest = Digest::parse(digest_path)?;
    let rois = dcm_paths_from_digest(digest_path, &digest, FW_ROI_KEY_PREFIX)?;
    let images = dcm_paths_from_digest(digest_path, &digest, FAT_FRACTION_KEY_PREFIX)?;
    let (roi_paths, image_paths) = pair_by_suffix(
        &rois,
        FW_ROI_KEY_PREFIX,
        &images,
        FAT_FRACTION_KEY_PREFIX,
        "fat fraction",
    );
    if roi_paths.is_empty() {
        warn!(
            "No paired ROI and fat fraction images in {}",
            digest_path.display()
        );
        return Ok(Vec::new());
    }

    let roi = ImageStack::load(&roi_paths)?.binarized();
    let mut image = ImageStack::load(&image_paths)?;
    for (i, path) in image_paths.iter().enumerate() {
        rescale_fat_fraction_plane(image.plane_mut(i), path);
    }

    if roi.rows() > image.rows()
        && image.rows() > 0
        && roi.rows() % image.rows() == 0
        && roi.rows() * image.cols() == image.rows() * roi.cols()
    {
        let zoom = roi.rows() / image.rows();
        image = image.upsampled(zoom);
    }

    Ok(masked_values(&roi, &image))
}

/// Summary statistics over [`roi_elastogram_values`]
pub fn measure_elastogram(digest_path: &Path) -> Result<Option<ContrastMeasurement>> {
    Ok(summarize(&roi_elastogram_values(digest_path)?))
}

/// Summary statistics over [`roi_fat_fraction_values`]
pub fn measure_fat_fraction(digest_path: &Path) -> Result<Option<ContrastMeasurement>> {
    Ok(summarize(&roi_fat_fraction_values(digest_path)?))
}

/// Pairs each ROI path with the partner image whose key carries the same
/// suffix, warning once when some ROIs stay unmatched
fn pair_by_suffix(
    rois: &BTreeMap<String, PathBuf>,
    roi_prefix: &str,
    images: &BTreeMap<String, PathBuf>,
    image_prefix: &str,
    partner: &str,
) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut roi_paths = Vec::new();
    let mut image_paths = Vec::new();
    for (roi_key, roi_path) in rois {
        let suffix = roi_key.strip_prefix(roi_prefix).unwrap_or(roi_key);
        let image_key = format!("{}{}", image_prefix, suffix);
        if let Some(image_path) = images.get(&image_key) {
            roi_paths.push(roi_path.clone());
            image_paths.push(image_path.clone());
        }
    }
    if roi_paths.len() < rois.len() {
        warn!("Not all ROI DICOM paths paired with a {} DICOM path", partner);
    }
    (roi_paths, image_paths)
}

fn rescale_fat_fraction_plane(plane: &mut Array2<f64>, path: &Path) {
    let dcm = match open_dicom_meta(path) {
        Ok(dcm) => dcm,
        Err(e) => {
            warn!(
                "No rescaling applied, could not reread {}: {}",
                path.display(),
                e
            );
            return;
        }
    };
    let slope = get_float_value(&dcm, RESCALE_SLOPE);
    let intercept = get_float_value(&dcm, RESCALE_INTERCEPT);
    match (slope, intercept) {
        (Some(slope), Some(intercept)) => {
            plane.mapv_inplace(|v| slope * v + intercept);
        }
        (None, Some(_)) => {
            warn!(
                "No rescaling applied, found intercept but no slope for {}",
                path.display()
            );
        }
        (Some(_), None) => {
            warn!(
                "No rescaling applied, found slope but no intercept for {}",
                path.display()
            );
        }
        (None, None) => {
            if get_string_value(&dcm, IMAGE_COMMENTS).as_deref() == Some(GRAY_VALUE_COMMENT) {
                plane.mapv_inplace(|v| 0.1 * v);
            } else if out_of_percent_range(plane) {
                warn!(
                    "No rescaling applied, but a significant amount of pixel values are out of range 0-100 for {}",
                    path.display()
                );
            }
        }
    }
}

/// A plane whose 10th percentile is negative or whose 90th percentile
/// exceeds 100 cannot plausibly be in percent units already
fn out_of_percent_range(plane: &Array2<f64>) -> bool {
    let values: Vec<f64> = plane.iter().copied().collect();
    let low = percentile_of(&values, 10.0);
    let high = percentile_of(&values, 90.0);
    low.map_or(false, |q| q < 0.0) || high.map_or(false, |q| q > 100.0)
}

fn masked_values(roi: &ImageStack, image: &ImageStack) -> Vec<f64> {
    if roi.len() != image.len() || roi.rows() != image.rows() || roi.cols() != image.cols() {
        warn!("ROI and image stacks have different dimensions, returning no values");
        return Vec::new();
    }
    let mut values = Vec::new();
    for i in 0..roi.len() {
        for (&r, &v) in roi.plane(i).iter().zip(image.plane(i)) {
            if r != 0.0 {
                values.push(v);
            }
        }
    }
    values
}
