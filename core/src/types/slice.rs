use super::Contrast;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Resolved image files for one ROI slice of a case
///
/// `contrast_paths` only holds contrasts whose image was found at the
/// same SliceLocation as the slice's magnitude image; absence means the
/// contrast is not available for this slice.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct SliceRecord {
    /// Slice key as recorded in the digest (not necessarily numeric)
    pub slice_number: String,

    /// ROI mask image drawn for this slice
    pub roi_path: PathBuf,

    /// SliceLocation of the matching magnitude image, in mm
    pub slice_location: Option<f64>,

    /// Located contrast images keyed by contrast type
    pub contrast_paths: BTreeMap<Contrast, PathBuf>,
}

impl SliceRecord {
    /// Creates a record with no location or contrast paths resolved yet
    pub fn new<S: Into<String>, P: Into<PathBuf>>(slice_number: S, roi_path: P) -> Self {
        Self {
            slice_number: slice_number.into(),
            roi_path: roi_path.into(),
            slice_location: None,
            contrast_paths: BTreeMap::new(),
        }
    }

    /// Looks up the located image for one contrast
    pub fn contrast_path(&self, contrast: Contrast) -> Option<&Path> {
        self.contrast_paths.get(&contrast).map(|p| p.as_path())
    }
}

/// Slice records keyed by slice number
pub type SliceData = BTreeMap<String, SliceRecord>;
