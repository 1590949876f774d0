use crate::measure::stack::ImageStack;
use crate::measure::stats::summarize;
use crate::types::{Contrast, ContrastReport, SliceData};
use log::warn;
use std::path::PathBuf;

/// Applies each slice's ROI mask to its contrast images and summarizes
/// the selected pixel values per contrast
///
/// A contrast with no usable slices or no selected pixels reports `None`
/// with a warning. Volumetric strain has no supported inversion output
/// and always reports `None`.
///
/// With `exclude_negative_pixels` set, negative storage, loss, and
/// attenuation values are dropped before selection.
pub fn apply_rois(slice_data: &SliceData, exclude_negative_pixels: bool) -> ContrastReport {
    let mut report = ContrastReport::new();
    for contrast in Contrast::ALL {
        let values = match contrast {
            Contrast::VolumetricStrain => {
                report.insert(contrast, None);
                continue;
            }
            Contrast::DampingRatio => damping_ratio_values(slice_data, exclude_negative_pixels),
            _ => direct_values(slice_data, contrast, exclude_negative_pixels),
        };

        let summary = match values {
            Some(values) => {
                let summary = summarize(&values);
                if summary.is_none() {
                    warn!("No valid pixels for {}, returning null output", contrast);
                }
                summary
            }
            None => {
                warn!(
                    "No slices have all required image paths for {}, returning null output",
                    contrast
                );
                None
            }
        };
        report.insert(contrast, summary);
    }
    report
}

/// Pixel values for a contrast with its own image files
///
/// `None` means no slice had both an ROI and a contrast path.
fn direct_values(
    slice_data: &SliceData,
    contrast: Contrast,
    exclude_negative_pixels: bool,
) -> Option<Vec<f64>> {
    let mut roi_paths = Vec::new();
    let mut contrast_paths = Vec::new();
    for record in slice_data.values() {
        let Some(path) = record.contrast_path(contrast) else {
            continue;
        };
        roi_paths.push(record.roi_path.clone());
        contrast_paths.push(path.to_path_buf());
    }
    if roi_paths.is_empty() {
        return None;
    }

    let Some(roi) = load_stack(&roi_paths) else {
        return Some(Vec::new());
    };
    let Some(image) = load_stack(&contrast_paths) else {
        return Some(Vec::new());
    };
    if image.rows() != roi.rows() || image.cols() != roi.cols() {
        warn!(
            "ROI and {} stacks have different dimensions, returning null output",
            contrast
        );
        return Some(Vec::new());
    }

    let factor = contrast.rescale_factor();
    let mut values = Vec::new();
    for i in 0..roi.len() {
        for (&r, &v) in roi.plane(i).iter().zip(image.plane(i)) {
            if exclude_negative_pixels && v < 0.0 {
                continue;
            }
            if r > 0.0 {
                values.push(v * factor);
            }
        }
    }
    Some(values)
}

/// Pixel values for the damping ratio, derived from storage and loss
///
/// `None` means no slice had ROI, storage, and loss paths together.
fn damping_ratio_values(slice_data: &SliceData, exclude_negative_pixels: bool) -> Option<Vec<f64>> {
    let mut roi_paths = Vec::new();
    let mut storage_paths = Vec::new();
    let mut loss_paths = Vec::new();
    for record in slice_data.values() {
        let (Some(storage), Some(loss)) = (
            record.contrast_path(Contrast::Storage),
            record.contrast_path(Contrast::Loss),
        ) else {
            continue;
        };
        roi_paths.push(record.roi_path.clone());
        storage_paths.push(storage.to_path_buf());
        loss_paths.push(loss.to_path_buf());
    }
    if roi_paths.is_empty() {
        return None;
    }

    let Some(roi) = load_stack(&roi_paths) else {
        return Some(Vec::new());
    };
    let Some(storage) = load_stack(&storage_paths) else {
        return Some(Vec::new());
    };
    let Some(loss) = load_stack(&loss_paths) else {
        return Some(Vec::new());
    };
    if storage.rows() != roi.rows()
        || storage.cols() != roi.cols()
        || loss.rows() != roi.rows()
        || loss.cols() != roi.cols()
    {
        warn!("ROI, storage, and loss stacks have different dimensions, returning null output");
        return Some(Vec::new());
    }

    let mut values = Vec::new();
    for i in 0..roi.len() {
        for ((&r, &s), &l) in roi
            .plane(i)
            .iter()
            .zip(storage.plane(i))
            .zip(loss.plane(i))
        {
            if exclude_negative_pixels && (s < 0.0 || l < 0.0) {
                continue;
            }
            // Zero storage leaves the ratio undefined rather than infinite
            if s == 0.0 {
                continue;
            }
            let ratio = 0.5 * l / s;
            if r > 0.0 && !ratio.is_nan() {
                values.push(ratio);
            }
        }
    }
    Some(values)
}

fn load_stack(paths: &[PathBuf]) -> Option<ImageStack> {
    match ImageStack::load(paths) {
        Ok(stack) => Some(stack),
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}
