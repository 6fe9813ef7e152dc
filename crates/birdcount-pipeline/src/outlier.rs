//! Repair of isolated dips in the raw cumulative count.

use crate::traits::SeriesStage;
use birdcount_common::Series;
use std::iter;
use tracing::debug;

/// Replaces a sample that dips below both neighbours with its corrected predecessor.
///
/// Each interior sample is compared against the already-corrected sample
/// before it and the raw sample after it. Spikes are left alone, and the
/// last sample is never checked against its predecessor.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlierCorrector;

impl OutlierCorrector {
    /// Creates a new corrector.
    pub const fn new() -> Self {
        Self
    }

    /// Returns the series with dips carried forward; same length, same timestamps.
    pub fn correct(&self, series: Series) -> Series {
        if series.len() < 3 {
            return series;
        }
        let first = series[0];
        let last = series[series.len() - 1];

        let corrected: Series = iter::once(first)
            .chain(series.windows(3).scan(first.count, |previous, window| {
                let (current, next) = (window[1], window[2]);
                let count = if current.count < *previous && current.count < next.count {
                    *previous
                } else {
                    current.count
                };
                *previous = count;
                Some(current.with_count(count))
            }))
            .chain(iter::once(last))
            .collect();

        let repaired = corrected
            .iter()
            .zip(&series)
            .filter(|(fixed, raw)| fixed.count != raw.count)
            .count();
        debug!(repaired, samples = series.len(), "Corrected dips in raw counts");

        corrected
    }
}

impl SeriesStage for OutlierCorrector {
    fn apply(&self, series: Series) -> Series {
        self.correct(series)
    }

    fn name(&self) -> &'static str {
        "outlier_corrector"
    }

    fn description(&self) -> &'static str {
        "Carries the previous count forward over isolated dips"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use birdcount_common::test_utils::{counts, series_from_counts, stockholm};

    fn correct(raw: &[u64]) -> Vec<u64> {
        let series = series_from_counts(stockholm(2015, 4, 1, 0, 0, 0), 120, raw);
        counts(&OutlierCorrector::new().correct(series))
    }

    #[test]
    fn test_single_dip_is_carried_forward() {
        assert_eq!(correct(&[70, 70, 68, 71, 72]), vec![70, 70, 70, 71, 72]);
    }

    #[test]
    fn test_spikes_are_kept() {
        assert_eq!(correct(&[70, 95, 71, 72]), vec![70, 95, 71, 72]);
    }

    #[test]
    fn test_uses_corrected_predecessor() {
        // After 68 is repaired to 70, 69 is below the corrected 70 and below 75.
        assert_eq!(correct(&[70, 68, 69, 75]), vec![70, 70, 70, 75]);
    }

    #[test]
    fn test_endpoints_are_never_changed() {
        assert_eq!(correct(&[70, 75, 10]), vec![70, 75, 10]);
        assert_eq!(correct(&[5, 70, 71]), vec![5, 70, 71]);
    }

    #[test]
    fn test_short_series_pass_through() {
        assert!(correct(&[]).is_empty());
        assert_eq!(correct(&[42]), vec![42]);
        assert_eq!(correct(&[42, 3]), vec![42, 3]);
    }

    #[test]
    fn test_timestamps_are_preserved() {
        let series = series_from_counts(stockholm(2015, 4, 1, 0, 0, 0), 120, &[70, 60, 71]);
        let corrected = OutlierCorrector::new().correct(series.clone());
        assert!(corrected
            .iter()
            .zip(&series)
            .all(|(a, b)| a.timestamp == b.timestamp));
    }
}
