use crate::api::CaseReport;
use crate::types::{Contrast, ContrastMeasurement};
use std::fmt;

/// Text report formatter for case measurements
pub struct TextReport<'a> {
    report: &'a CaseReport,
    fat_fraction: Option<Option<ContrastMeasurement>>,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(report: &'a CaseReport) -> Self {
        Self {
            report,
            fat_fraction: None,
        }
    }

    /// Adds a fat fraction section to the report
    pub fn with_fat_fraction(mut self, measurement: Option<ContrastMeasurement>) -> Self {
        self.fat_fraction = Some(measurement);
        self
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Case Measurements")?;
        writeln!(f, "=================")?;
        writeln!(f)?;
        writeln!(f, "Digest:         {}", self.report.digest_path.display())?;
        writeln!(
            f,
            "Slices:         {} ({} with slice location)",
            self.report.slice_data.len(),
            self.report.located_slices()
        )?;
        writeln!(f)?;

        writeln!(f, "Slice Pairings")?;
        writeln!(f, "--------------")?;
        for (number, record) in &self.report.slice_data {
            match record.slice_location {
                Some(location) => writeln!(f, "{}: location {}", number, location)?,
                None => writeln!(f, "{}: location unknown", number)?,
            }
            writeln!(f, "  roi: {}", record.roi_path.display())?;
            for (contrast, path) in &record.contrast_paths {
                writeln!(f, "  {}: {}", contrast.simple_name(), path.display())?;
            }
        }
        writeln!(f)?;

        writeln!(f, "Contrast Statistics")?;
        writeln!(f, "-------------------")?;
        for contrast in Contrast::ALL {
            let label = format!("{}:", contrast.simple_name());
            match self.report.contrast(contrast) {
                Some(m) => writeln!(f, "{:<19}{}", label, summary_line(&m))?,
                None => writeln!(f, "{:<19}no measurement", label)?,
            }
        }

        if let Some(fat_fraction) = &self.fat_fraction {
            writeln!(f)?;
            writeln!(f, "Fat Fraction")?;
            writeln!(f, "------------")?;
            match fat_fraction {
                Some(m) => writeln!(f, "{}", summary_line(m))?,
                None => writeln!(f, "no paired images")?,
            }
        }

        Ok(())
    }
}

fn summary_line(m: &ContrastMeasurement) -> String {
    format!(
        "mean {} (sd {}), median {}, IQR {}",
        m.mean,
        m.stddev,
        m.median,
        m.range_string()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContrastReport, SliceData, SliceRecord};
    use std::path::PathBuf;

    fn sample_report() -> CaseReport {
        let mut slice_data = SliceData::new();
        let mut record = SliceRecord::new("004", PathBuf::from("/tmp/roi.4.dcm"));
        record.slice_location = Some(-12.5);
        record
            .contrast_paths
            .insert(Contrast::Storage, PathBuf::from("/data/case/3dmmdi/s1226/b.dcm"));
        slice_data.insert("004".to_string(), record);
        slice_data.insert(
            "005".to_string(),
            SliceRecord::new("005", PathBuf::from("/tmp/roi.5.dcm")),
        );

        let mut contrasts = ContrastReport::new();
        contrasts.insert(
            Contrast::Storage,
            Some(ContrastMeasurement {
                mean: 2.41,
                stddev: 0.35,
                median: 2.38,
                p25: 2.21,
                p75: 2.6,
            }),
        );
        contrasts.insert(Contrast::Loss, None);

        CaseReport {
            digest_path: PathBuf::from("/data/case/digest.alc2"),
            slice_data,
            contrasts,
        }
    }

    #[test]
    fn test_text_report_format() {
        let report = sample_report();
        let output = format!("{}", TextReport::new(&report));

        assert!(output.contains("Case Measurements"));
        assert!(output.contains("Digest:         /data/case/digest.alc2"));
        assert!(output.contains("Slices:         2 (1 with slice location)"));
        assert!(output.contains("004: location -12.5"));
        assert!(output.contains("  roi: /tmp/roi.4.dcm"));
        assert!(output.contains("  storage: /data/case/3dmmdi/s1226/b.dcm"));
        assert!(output.contains("005: location unknown"));
        assert!(output.contains("storage:           mean 2.41 (sd 0.35), median 2.38, IQR 2.21 - 2.6"));
        assert!(output.contains("loss:              no measurement"));
        assert!(!output.contains("Fat Fraction"));
    }

    #[test]
    fn test_text_report_with_fat_fraction() {
        let report = sample_report();
        let measurement = ContrastMeasurement {
            mean: 12.4,
            stddev: 1.3,
            median: 12.2,
            p25: 11.5,
            p75: 13.3,
        };
        let output = format!("{}", TextReport::new(&report).with_fat_fraction(Some(measurement)));

        assert!(output.contains("Fat Fraction"));
        assert!(output.contains("mean 12.4 (sd 1.3), median 12.2, IQR 11.5 - 13.3"));
    }

    #[test]
    fn test_text_report_with_empty_fat_fraction() {
        let report = sample_report();
        let output = format!("{}", TextReport::new(&report).with_fat_fraction(None));

        assert!(output.contains("no paired images"));
    }
}
