use std::fmt;

/// MR scanner vendor recognized during dataset discovery
///
/// Classified by case-insensitive substring match on the Manufacturer
/// tag. Each vendor carries its own rule for what counts as a usable
/// 3D MRE series folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum Manufacturer {
    #[default]
    Unknown,
    Ge,
    Siemens,
    Philips,
}

impl Manufacturer {
    /// Classifies a Manufacturer tag value
    ///
    /// Siemens and Philips are checked before GE; "ge" is short enough
    /// to appear inside unrelated vendor strings.
    pub fn classify(value: &str) -> Self {
        let value_lower = value.to_lowercase();
        if value_lower.contains("siemens") {
            Manufacturer::Siemens
        } else if value_lower.contains("philips") {
            Manufacturer::Philips
        } else if value_lower.contains("ge") {
            Manufacturer::Ge
        } else {
            Manufacturer::Unknown
        }
    }

    /// Returns whether the manufacturer could not be classified
    pub fn is_unknown(&self) -> bool {
        matches!(self, Manufacturer::Unknown)
    }

    /// Returns whether this vendor ships phase data as a separate series
    ///
    /// Siemens exports magnitude and phase as sibling series; GE and
    /// Philips pack everything into the magnitude folder.
    pub fn requires_phase(&self) -> bool {
        matches!(self, Manufacturer::Siemens)
    }

    /// Vendor rule for whether one series folder holds usable 3D MRE data
    ///
    /// # Arguments
    ///
    /// * `description` - SeriesDescription of a file in the folder
    /// * `file_count` - number of DICOM files counted in the folder
    pub fn series_is_valid(&self, description: &str, file_count: usize) -> bool {
        match self {
            Manufacturer::Ge => description.contains("MRE") && file_count > 800,
            Manufacturer::Siemens => description.contains("928") && description.contains("3D"),
            Manufacturer::Philips => file_count > 280,
            Manufacturer::Unknown => false,
        }
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            Manufacturer::Unknown => "unknown",
            Manufacturer::Ge => "GE",
            Manufacturer::Siemens => "Siemens",
            Manufacturer::Philips => "Philips",
        }
    }
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Contrast maps measured from the 3D inversion output
///
/// Direct contrasts are written by the inversion tool into folders
/// tagged with a fixed two-digit code. Damping ratio is computed from
/// storage and loss; volumetric strain has no supported output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "snake_case"))]
pub enum Contrast {
    Storage,
    Loss,
    Attenuation,
    DampingRatio,
    VolumetricStrain,
}

impl Contrast {
    /// All contrast types in reporting order
    pub const ALL: [Contrast; 5] = [
        Contrast::Storage,
        Contrast::Loss,
        Contrast::Attenuation,
        Contrast::DampingRatio,
        Contrast::VolumetricStrain,
    ];

    /// Two-digit folder code the inversion tool writes this contrast under
    pub fn dir_code(&self) -> Option<&'static str> {
        match self {
            Contrast::Storage => Some("26"),
            Contrast::Loss => Some("27"),
            Contrast::Attenuation => Some("28"),
            Contrast::DampingRatio | Contrast::VolumetricStrain => None,
        }
    }

    /// Returns whether the inversion tool writes this contrast directly
    pub fn is_direct(&self) -> bool {
        self.dir_code().is_some()
    }

    /// Unit conversion factor applied to selected pixels
    ///
    /// The factors undo the integer encoding the inversion tool stores
    /// its maps in. Ratios are already dimensionless.
    pub fn rescale_factor(&self) -> f64 {
        match self {
            Contrast::Storage | Contrast::Loss => 1e-3,
            Contrast::Attenuation => 1e-4,
            Contrast::DampingRatio | Contrast::VolumetricStrain => 1.0,
        }
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            Contrast::Storage => "storage",
            Contrast::Loss => "loss",
            Contrast::Attenuation => "attenuation",
            Contrast::DampingRatio => "damping_ratio",
            Contrast::VolumetricStrain => "volumetric_strain",
        }
    }
}

impl fmt::Display for Contrast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// How thoroughly dataset discovery examines each series folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Parse one file per folder and count every file as a DICOM
    #[default]
    Rapid,
    /// Parse every file and count only the ones that parse
    Careful,
}
