pub mod api;
pub mod cli;
pub mod digest;
pub mod discovery;
pub mod error;
pub mod inversion;
pub mod locator;
pub mod measure;
pub mod paths;
pub mod tags;
pub mod types;

pub use api::{CaseMeasurer, CaseReport, MeasureOptions};
pub use cli::report::TextReport;
pub use digest::Digest;
pub use discovery::scan_datasets;
pub use error::{ElastokitError, Result};
pub use inversion::{run_case, InversionOutcome};
pub use locator::{locate_slice_data, LocatorOptions};
pub use measure::{apply_rois, measure_elastogram, measure_fat_fraction};
pub use types::*;
