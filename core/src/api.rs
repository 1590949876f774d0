//! High-level API for measuring a processed MRE case
//!
//! This module provides the main entry point for turning a case's
//! `.alc2` digest into ROI contrast measurements.

use crate::error::Result;
use crate::locator::{locate_slice_data, LocatorOptions};
use crate::measure::apply_rois;
use crate::paths::normalize;
use crate::types::{Contrast, ContrastMeasurement, ContrastReport, SliceData};
use std::path::{Path, PathBuf};

/// Options for [`CaseMeasurer::measure_with_options`]
#[derive(Debug, Clone, Default)]
pub struct MeasureOptions {
    /// Directory holding the ROI files; defaults to the digest's directory
    pub temp_dir: Option<PathBuf>,

    /// Inversion output directory; defaults to the `3dmmdi` folder near
    /// the digest
    pub inversion_dir: Option<PathBuf>,

    /// Drop negative storage, loss, and attenuation pixels before
    /// selection
    pub exclude_negative_pixels: bool,
}

/// Measurement result for one case
#[derive(Debug, Clone)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct CaseReport {
    /// Normalized path of the digest the case was measured from
    pub digest_path: PathBuf,

    /// Per-slice ROI, magnitude location, and contrast paths
    pub slice_data: SliceData,

    /// Summary statistics per contrast, `None` where nothing could be
    /// measured
    pub contrasts: ContrastReport,
}

impl CaseReport {
    /// Number of slices with a resolved SliceLocation
    pub fn located_slices(&self) -> usize {
        self.slice_data
            .values()
            .filter(|record| record.slice_location.is_some())
            .count()
    }

    /// Summary for one contrast, `None` when it could not be measured
    pub fn contrast(&self, contrast: Contrast) -> Option<ContrastMeasurement> {
        self.contrasts.get(&contrast).copied().flatten()
    }
}

/// Main entry point for measuring ROI contrast statistics
///
/// Builds the slice table from a case's digest and applies every
/// slice's ROI mask to the inversion-output contrast images.
///
/// # Example
///
/// ```no_run
/// use elastokit_core::{CaseMeasurer, Contrast};
/// use std::path::Path;
///
/// let report = CaseMeasurer::measure(Path::new("/data/case/proc/ab/study.alc2"))?;
/// if let Some(storage) = report.contrast(Contrast::Storage) {
///     println!("storage mean: {} kPa", storage.mean);
/// }
/// # Ok::<(), elastokit_core::ElastokitError>(())
/// ```
pub struct CaseMeasurer;

impl CaseMeasurer {
    /// Measures a case with default directories
    ///
    /// # Errors
    ///
    /// Returns an error if the digest is invalid or a required directory
    /// is missing
    pub fn measure(digest_path: &Path) -> Result<CaseReport> {
        Self::measure_with_options(digest_path, &MeasureOptions::default())
    }

    /// Measures a case with explicit directories and pixel filtering
    ///
    /// # Errors
    ///
    /// Returns an error if the digest is invalid or a configured
    /// directory is missing
    pub fn measure_with_options(
        digest_path: &Path,
        options: &MeasureOptions,
    ) -> Result<CaseReport> {
        let locator_options = LocatorOptions {
            temp_dir: options.temp_dir.clone(),
            inversion_dir: options.inversion_dir.clone(),
        };
        let slice_data = locate_slice_data(digest_path, &locator_options)?;
        let contrasts = apply_rois(&slice_data, options.exclude_negative_pixels);

        Ok(CaseReport {
            digest_path: normalize(digest_path),
            slice_data,
            contrasts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SliceRecord;

    fn sample_report() -> CaseReport {
        let mut slice_data = SliceData::new();
        let mut located = SliceRecord::new("1", "/tmp/roi_1.dcm");
        located.slice_location = Some(12.5);
        slice_data.insert("1".to_string(), located);
        slice_data.insert("2".to_string(), SliceRecord::new("2", "/tmp/roi_2.dcm"));

        let mut contrasts = ContrastReport::new();
        contrasts.insert(
            Contrast::Storage,
            Some(ContrastMeasurement {
                mean: 2.21,
                stddev: 0.34,
                median: 2.2,
                p25: 2.0,
                p75: 2.4,
            }),
        );
        contrasts.insert(Contrast::VolumetricStrain, None);

        CaseReport {
            digest_path: PathBuf::from("/data/case/proc/ab/study.alc2"),
            slice_data,
            contrasts,
        }
    }

    #[test]
    fn test_located_slices_counts_resolved_locations() {
        assert_eq!(sample_report().located_slices(), 1);
    }

    #[test]
    fn test_contrast_lookup() {
        let report = sample_report();
        assert_eq!(report.contrast(Contrast::Storage).unwrap().mean, 2.21);
        assert!(report.contrast(Contrast::VolumetricStrain).is_none());
        assert!(report.contrast(Contrast::Loss).is_none());
    }
}
