use crate::discovery::{detect_frequency, DEFAULT_FREQUENCY_HZ};
use crate::error::{ElastokitError, Result};
use crate::inversion::InversionCommand;
use crate::types::{DatasetEntry, DatasetScan, Manufacturer};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Result of running the inversion tool over every dataset in a scan
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct InversionOutcome {
    /// Series directories whose inversion exited cleanly
    pub completed: Vec<PathBuf>,

    /// Labels of datasets whose inversion failed to launch or exited nonzero
    pub failed: Vec<String>,
}

/// Runs the inversion tool on a single dataset and returns its exit code
///
/// The mechanical frequency is detected from the magnitude folder before
/// the command is assembled. The tool resolves its own auxiliary files
/// relative to its binary, so the child process runs with the working
/// directory set to the executable's directory.
///
/// # Errors
///
/// Returns an error if the entry is incomplete for the vendor or the
/// process cannot be launched
pub fn run_series(
    exe: &Path,
    top_dir: &Path,
    manufacturer: Manufacturer,
    entry: &DatasetEntry,
    series_dir: &Path,
) -> Result<i32> {
    let frequency_hz = entry
        .mag
        .as_deref()
        .map(|mag| detect_frequency(&top_dir.join(mag)))
        .unwrap_or(DEFAULT_FREQUENCY_HZ);

    let command = InversionCommand::for_series(
        exe,
        top_dir,
        manufacturer,
        entry,
        series_dir,
        frequency_hz,
    )?;
    info!("Running {}", command);

    let cwd = match command.exe.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let output = Command::new(&command.exe)
        .args(&command.args)
        .current_dir(&cwd)
        .output()
        .map_err(|e| {
            ElastokitError::InversionError(format!(
                "failed to launch {}: {}",
                command.exe.display(),
                e
            ))
        })?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        info!("{}", line);
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        warn!("{}", line);
    }

    Ok(output.status.code().unwrap_or(-1))
}

/// Runs the inversion tool over every dataset found by a scan
///
/// Each dataset gets its own output directory under `inversion_dir`,
/// named after the magnitude series number. Failures never abort the
/// batch; the outcome reports completed and failed datasets separately.
pub fn run_case(exe: &Path, scan: &DatasetScan, inversion_dir: &Path) -> InversionOutcome {
    let mut outcome = InversionOutcome::default();

    if scan.is_empty() {
        warn!("No 3D MRE data found in {}", scan.top_dir.display());
        return outcome;
    }

    for entry in &scan.entries {
        let label = entry
            .mag
            .as_deref()
            .or(entry.phase.as_deref())
            .unwrap_or("<unknown series>")
            .to_string();

        let series_dir = match entry.mag_series {
            Some(series) => inversion_dir.join(series.to_string()),
            None => {
                warn!("No magnitude series number for {}, skipping inversion", label);
                outcome.failed.push(label);
                continue;
            }
        };
        if let Err(e) = fs::create_dir_all(&series_dir) {
            warn!("Could not create {}: {}", series_dir.display(), e);
            outcome.failed.push(label);
            continue;
        }

        match run_series(exe, &scan.top_dir, scan.manufacturer, entry, &series_dir) {
            Ok(0) => {
                info!("Appending {} to successful series dirs", series_dir.display());
                outcome.completed.push(series_dir);
            }
            Ok(code) => {
                warn!("Unsuccessful 3D inversion on {} (exit code {})", label, code);
                outcome.failed.push(label);
            }
            Err(e) => {
                warn!("Unsuccessful 3D inversion on {}: {}", label, e);
                outcome.failed.push(label);
            }
        }
    }

    outcome
}
