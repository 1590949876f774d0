//! ROI statistics over contrast, elastogram, and fat-fraction images
//!
//! Two measurement shapes share the same mask-and-summarize pattern:
//! per-slice contrast stacks located through the slice table, and
//! digest-paired 2D image sets resolved directly from recorded paths.

mod contrasts;
mod paired;
mod stack;
mod stats;
#[cfg(test)]
pub(crate) mod testing;

pub use contrasts::apply_rois;
pub use paired::{
    dcm_paths_from_digest, measure_elastogram, measure_fat_fraction, roi_elastogram_values,
    roi_fat_fraction_values,
};
pub use stack::ImageStack;
pub use stats::summarize;
