//! Core type definitions for MRE case processing
//!
//! This module provides the fundamental types used throughout the elastokit library:
//! - [`Manufacturer`]: Scanner vendor classification (GE, Siemens, Philips)
//! - [`Contrast`]: Contrast maps measured from inversion output
//! - [`ScanMode`]: How thoroughly dataset discovery parses series folders
//! - [`DatasetEntry`] / [`DatasetScan`]: Discovered magnitude/phase pairings
//! - [`SliceRecord`] / [`SliceData`]: Per-slice resolved image files
//! - [`ContrastMeasurement`] / [`ContrastReport`]: ROI summary statistics

mod dataset;
mod enums;
mod slice;
mod summary;

pub use dataset::{DatasetEntry, DatasetScan};
pub use enums::{Contrast, Manufacturer, ScanMode};
pub use slice::{SliceData, SliceRecord};
pub use summary::{ContrastMeasurement, ContrastReport};
