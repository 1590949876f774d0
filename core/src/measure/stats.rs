use crate::types::ContrastMeasurement;
use std::cmp::Ordering;

/// Summarizes a set of pixel values
///
/// The summary carries the mean, population standard deviation, median,
/// and 25th/75th percentiles, all rounded to 2 decimals. Percentiles use
/// linear interpolation between the closest ranks. Returns `None` for an
/// empty set.
pub fn summarize(values: &[f64]) -> Option<ContrastMeasurement> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    Some(ContrastMeasurement {
        mean: round2(mean),
        stddev: round2(variance.sqrt()),
        median: round2(percentile(&sorted, 50.0)),
        p25: round2(percentile(&sorted, 25.0)),
        p75: round2(percentile(&sorted, 75.0)),
    })
}

/// Unrounded percentile of an unsorted set, `None` when empty
pub(crate) fn percentile_of(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Some(percentile(&sorted, q))
}

fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = (sorted.len() - 1) as f64 * q / 100.0;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_four_values() {
        let summary = summarize(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(summary.mean, 2.5);
        assert_eq!(summary.stddev, 1.12);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.p25, 1.75);
        assert_eq!(summary.p75, 3.25);
    }

    #[test]
    fn test_summarize_single_value() {
        let summary = summarize(&[7.0]).unwrap();
        assert_eq!(summary.mean, 7.0);
        assert_eq!(summary.stddev, 0.0);
        assert_eq!(summary.median, 7.0);
        assert_eq!(summary.p25, 7.0);
        assert_eq!(summary.p75, 7.0);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_summarize_rounds_to_two_decimals() {
        let summary = summarize(&[0.111, 0.222, 0.333]).unwrap();
        assert_eq!(summary.mean, 0.22);
        assert_eq!(summary.median, 0.22);
    }

    #[test]
    fn test_summarize_unordered_input() {
        let summary = summarize(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.p25, 1.75);
    }

    #[test]
    fn test_percentile_of() {
        assert_eq!(percentile_of(&[3.0, 1.0, 2.0], 50.0), Some(2.0));
        assert_eq!(percentile_of(&[1.0, 2.0], 10.0), Some(1.1));
        assert_eq!(percentile_of(&[], 50.0), None);
    }
}
