//! Rebuilds a plausible cumulative count from noisy raw readings.

use crate::movement::clamped_step;
use crate::traits::SeriesStage;
use birdcount_common::Series;
use std::iter;
use tracing::debug;

/// Bounds the growth of the cumulative count per step.
///
/// Each step's delta is taken against the previous raw reading, clamped to
/// `[0, max_step]` and added to a running total that starts at the first
/// raw count. The result is non-decreasing.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    max_step: u64,
}

impl RateLimiter {
    /// Default clamp per step.
    pub const DEFAULT_MAX_STEP: u64 = 8;

    /// Creates a limiter with the given per-step clamp.
    pub const fn new(max_step: u64) -> Self {
        Self { max_step }
    }

    /// The configured clamp.
    pub const fn max_step(&self) -> u64 {
        self.max_step
    }

    /// Rebuilds the series as a bounded running total.
    pub fn limit(&self, series: Series) -> Series {
        let Some(&first) = series.first() else {
            return series;
        };
        let max_step = self.max_step;

        let limited: Series = iter::once(first)
            .chain(series.windows(2).scan(first.count, |total, pair| {
                *total = total.saturating_add(clamped_step(pair[0].count, pair[1].count, max_step));
                Some(pair[1].with_count(*total))
            }))
            .collect();

        debug!(
            samples = series.len(),
            raw_last = series[series.len() - 1].count,
            limited_last = limited[limited.len() - 1].count,
            "Rate-limited series"
        );
        limited
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_STEP)
    }
}

impl SeriesStage for RateLimiter {
    fn apply(&self, series: Series) -> Series {
        self.limit(series)
    }

    fn name(&self) -> &'static str {
        "rate_limiter"
    }

    fn description(&self) -> &'static str {
        "Clamps each step of the cumulative count to the plausible range"
    }
}
