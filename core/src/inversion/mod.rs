//! Construction and supervision of the external 3D inversion tool
//!
//! The inversion algorithm itself lives in a separate executable. This
//! module builds its vendor-specific command lines and runs it once per
//! discovered dataset, collecting per-series outcomes.

mod command;
mod runner;

pub use command::InversionCommand;
pub use runner::{run_case, run_series, InversionOutcome};
