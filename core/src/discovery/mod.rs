//! 3D MRE dataset discovery
//!
//! Walks a case directory's series folders, classifies the scanner
//! vendor, and pairs magnitude and phase series into datasets ready for
//! inversion. Also detects the driver frequency recorded in series
//! descriptions.

mod frequency;
mod scan;

pub use frequency::{detect_frequency, frequency_from_description, DEFAULT_FREQUENCY_HZ};
pub use scan::scan_datasets;
