use super::Manufacturer;
use std::path::PathBuf;

/// One magnitude/phase series pairing discovered in a case directory
///
/// GE and Philips acquisitions are fully described by the magnitude
/// folder. Siemens acquisitions also need a phase folder whose series
/// number is one past the magnitude series number; an entry holding
/// only one half stays incomplete until the scan meets the other.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct DatasetEntry {
    /// Magnitude folder name, relative to the case directory
    pub mag: Option<String>,

    /// SeriesNumber of the magnitude series
    pub mag_series: Option<i32>,

    /// Phase folder name, relative to the case directory (Siemens only)
    pub phase: Option<String>,

    /// SeriesNumber of the phase series (Siemens only)
    pub phase_series: Option<i32>,
}

impl DatasetEntry {
    /// Creates an entry holding only a magnitude half
    pub fn with_mag(folder: &str, series: i32) -> Self {
        Self {
            mag: Some(folder.to_string()),
            mag_series: Some(series),
            ..Self::default()
        }
    }

    /// Creates an entry holding only a phase half
    pub fn with_phase(folder: &str, series: i32) -> Self {
        Self {
            phase: Some(folder.to_string()),
            phase_series: Some(series),
            ..Self::default()
        }
    }

    /// Returns whether the entry has everything the vendor's inversion needs
    pub fn is_complete(&self, manufacturer: Manufacturer) -> bool {
        match manufacturer {
            Manufacturer::Siemens => self.mag.is_some() && self.phase.is_some(),
            Manufacturer::Ge | Manufacturer::Philips => self.mag.is_some(),
            Manufacturer::Unknown => false,
        }
    }
}

/// All 3D MRE datasets found under one case directory
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct DatasetScan {
    /// Case directory that was scanned
    pub top_dir: PathBuf,

    /// Scanner vendor of the discovered series
    pub manufacturer: Manufacturer,

    /// Discovered series pairings, in folder scan order
    pub entries: Vec<DatasetEntry>,
}

impl DatasetScan {
    /// Creates an empty scan result for a case directory
    pub fn new<P: Into<PathBuf>>(top_dir: P) -> Self {
        Self {
            top_dir: top_dir.into(),
            manufacturer: Manufacturer::Unknown,
            entries: Vec::new(),
        }
    }

    /// Returns whether the scan found no datasets
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_constructors() {
        let mag = DatasetEntry::with_mag("4", 12);
        assert_eq!(mag.mag.as_deref(), Some("4"));
        assert_eq!(mag.mag_series, Some(12));
        assert_eq!(mag.phase, None);

        let phase = DatasetEntry::with_phase("5", 13);
        assert_eq!(phase.phase.as_deref(), Some("5"));
        assert_eq!(phase.phase_series, Some(13));
        assert_eq!(phase.mag, None);
    }

    #[test]
    fn test_entry_completeness() {
        let mag_only = DatasetEntry::with_mag("4", 12);
        assert!(mag_only.is_complete(Manufacturer::Ge));
        assert!(mag_only.is_complete(Manufacturer::Philips));
        assert!(!mag_only.is_complete(Manufacturer::Siemens));
        assert!(!mag_only.is_complete(Manufacturer::Unknown));

        let mut paired = mag_only;
        paired.phase = Some("5".to_string());
        paired.phase_series = Some(13);
        assert!(paired.is_complete(Manufacturer::Siemens));
    }

    #[test]
    fn test_scan_empty() {
        let scan = DatasetScan::new("/data/case");
        assert!(scan.is_empty());
        assert_eq!(scan.manufacturer, Manufacturer::Unknown);
    }
}
