pub mod report;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for elastokit
#[derive(Parser, Debug)]
#[command(name = "elastokit")]
#[command(about = "MRE ROI contrast measurement tool")]
#[command(version)]
pub struct Cli {
    /// Path to the digest file describing the case
    #[arg(value_name = "DIGEST")]
    pub digest: PathBuf,

    /// Directory holding the ROI DICOM files (defaults to the digest's directory)
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Directory holding the 3D inversion outputs (defaults to <case>/3dmmdi)
    #[arg(long, value_name = "DIR")]
    pub inversion_dir: Option<PathBuf>,

    /// Drop negative pixel values before computing statistics
    #[arg(long)]
    pub exclude_negative_pixels: bool,

    /// Also measure the fat fraction images paired with fat-water ROIs
    #[arg(long)]
    pub fat_fraction: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}
