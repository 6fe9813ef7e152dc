//! Synthetic samples for intervals where the logger missed readings.

use crate::traits::SeriesStage;
use birdcount_common::{Sample, Series};
use chrono::TimeDelta;
use std::iter;
use tracing::{debug, warn};

/// Inserts flat samples into gaps longer than `max_gap`.
#[derive(Debug, Clone, Copy)]
pub struct GapFiller {
    max_gap: TimeDelta,
}

impl GapFiller {
    /// Default gap threshold in milliseconds, 2.1 minutes.
    pub const DEFAULT_MAX_GAP_MS: i64 = 126_000;

    /// Creates a filler with the given threshold.
    pub const fn new(max_gap: TimeDelta) -> Self {
        Self { max_gap }
    }

    /// The configured threshold.
    pub const fn max_gap(&self) -> TimeDelta {
        self.max_gap
    }

    /// Fills every gap between consecutive samples.
    ///
    /// Between `current` and `next`, a sample carrying `current`'s count is
    /// emitted every `max_gap` while the cursor plus `max_gap` is still
    /// before `next`. The last sample is emitted as-is.
    pub fn fill(&self, series: Series) -> Series {
        let max_gap = self.max_gap;
        if max_gap <= TimeDelta::zero() {
            warn!(
                max_gap_ms = max_gap.num_milliseconds(),
                "Non-positive gap threshold, skipping gap filling"
            );
            return series;
        }
        let Some(&last) = series.last() else {
            return series;
        };

        let filled: Series = series
            .windows(2)
            .flat_map(|pair| {
                let (current, next) = (pair[0], pair[1]);
                iter::successors(Some(current.timestamp), move |cursor| {
                    Some(*cursor + max_gap).filter(|step| *step < next.timestamp)
                })
                .map(move |timestamp| Sample::new(timestamp, current.count))
            })
            .chain(iter::once(last))
            .collect();

        debug!(
            inserted = filled.len() - series.len(),
            samples = series.len(),
            "Filled gaps in series"
        );
        filled
    }
}

impl Default for GapFiller {
    fn default() -> Self {
        Self::new(TimeDelta::milliseconds(Self::DEFAULT_MAX_GAP_MS))
    }
}

impl SeriesStage for GapFiller {
    fn apply(&self, series: Series) -> Series {
        self.fill(series)
    }

    fn name(&self) -> &'static str {
        "gap_filler"
    }

    fn description(&self) -> &'static str {
        "Repeats the last count across intervals longer than the gap threshold"
    }
}
