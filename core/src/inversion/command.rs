use crate::discovery::DEFAULT_FREQUENCY_HZ;
use crate::error::{ElastokitError, Result};
use crate::types::{DatasetEntry, Manufacturer};
use std::fmt;
use std::path::{Path, PathBuf};

/// An assembled invocation of the external 3D inversion tool
///
/// The tool takes `+flag value` style arguments. Flag order matters to
/// its parser, so the argument list is built in one fixed sequence:
/// common flags, vendor input flags, log flags, then the frequency
/// override.
#[derive(Debug, Clone, PartialEq)]
pub struct InversionCommand {
    /// Inversion executable
    pub exe: PathBuf,

    /// Arguments in the order the tool expects
    pub args: Vec<String>,
}

impl InversionCommand {
    /// Builds the invocation for one dataset
    ///
    /// `frequency_hz` is only passed through to the tool when it
    /// differs from the 60 Hz default baked into the tool itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry lacks a folder the vendor needs or
    /// the manufacturer is unknown
    pub fn for_series(
        exe: &Path,
        top_dir: &Path,
        manufacturer: Manufacturer,
        entry: &DatasetEntry,
        series_dir: &Path,
        frequency_hz: u32,
    ) -> Result<Self> {
        let mag = entry.mag.as_deref().ok_or_else(|| {
            ElastokitError::InversionError(format!(
                "no magnitude folder recorded for a series in {}",
                top_dir.display()
            ))
        })?;

        let mut args: Vec<String> = vec![
            "+liver".into(),
            "+dicom".into(),
            "+mag-out".into(),
            "+pdif-out".into(),
            "+save-checker".into(),
            "+save-div".into(),
            "+save-atten".into(),
            "+verbosity".into(),
            "2".into(),
            "+max-threads".into(),
            "3".into(),
            "+file-indir".into(),
            top_dir.to_string_lossy().into_owned(),
        ];

        match manufacturer {
            Manufacturer::Ge => {
                args.push("+iq-dir".into());
                args.push(mag.to_string());
            }
            Manufacturer::Philips => {
                args.push("+time-direction".into());
                args.push("1".into());
                args.push("+mp-dir".into());
                args.push(mag.to_string());
            }
            Manufacturer::Siemens => {
                let phase = entry.phase.as_deref().ok_or_else(|| {
                    ElastokitError::InversionError(format!(
                        "no phase folder recorded for Siemens series {}",
                        mag
                    ))
                })?;
                args.push("+time-direction".into());
                args.push("1".into());
                args.push("+mag-time-dir".into());
                args.push(mag.to_string());
                args.push("+phs-dir".into());
                args.push(phase.to_string());
            }
            Manufacturer::Unknown => {
                return Err(ElastokitError::InversionError(format!(
                    "unknown manufacturer for {}",
                    top_dir.display()
                )));
            }
        }

        args.push("+log-dir".into());
        args.push(series_dir.to_string_lossy().into_owned());
        args.push("+log-file".into());
        args.push("mmdi3d.log".into());

        if frequency_hz != DEFAULT_FREQUENCY_HZ {
            args.push("+hz".into());
            args.push(frequency_hz.to_string());
        }

        Ok(Self {
            exe: exe.to_path_buf(),
            args,
        })
    }
}

impl fmt::Display for InversionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.exe.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
