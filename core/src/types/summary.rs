use super::Contrast;
use std::collections::BTreeMap;

/// Summary statistics over the ROI-selected pixels of one contrast
///
/// Values are rounded to 2 decimals at construction. The standard
/// deviation is the population form.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ContrastMeasurement {
    pub mean: f64,
    pub stddev: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
}

impl ContrastMeasurement {
    /// Formats the interquartile range the way reports print it
    pub fn range_string(&self) -> String {
        format!("{} - {}", self.p25, self.p75)
    }
}

/// Per-contrast measurement results
///
/// `None` marks a contrast with no valid pixels or no usable slices.
pub type ContrastReport = BTreeMap<Contrast, Option<ContrastMeasurement>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_string() {
        let m = ContrastMeasurement {
            mean: 2.21,
            stddev: 0.35,
            median: 2.2,
            p25: 1.9,
            p75: 2.54,
        };
        assert_eq!(m.range_string(), "1.9 - 2.54");
    }
}
