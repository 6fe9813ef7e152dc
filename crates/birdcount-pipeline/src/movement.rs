//! Per-step movement derivation and date-range filtering.

use birdcount_common::{Movement, Sample, Selection, Series};
use tracing::debug;

/// The increase from `previous` to `current`, clamped to `[0, max_step]`.
pub const fn clamped_step(previous: u64, current: u64, max_step: u64) -> u64 {
    let delta = current.saturating_sub(previous);
    if delta < max_step {
        delta
    } else {
        max_step
    }
}

/// Movements between consecutive samples, attributed to the later one.
///
/// The first sample has no predecessor in the slice and contributes nothing,
/// so a series shorter than two samples yields no movements.
pub fn derive_movements(series: &[Sample], max_step: u64) -> Vec<Movement> {
    series
        .windows(2)
        .map(|pair| Movement {
            timestamp: pair[1].timestamp,
            amount: clamped_step(pair[0].count, pair[1].count, max_step),
        })
        .collect()
}

/// Keeps the samples in `[selection.start, selection.end())`.
pub fn filter_range(series: Series, selection: &Selection) -> Series {
    let (start, end) = (selection.start, selection.end());
    let total = series.len();
    let kept: Series = series
        .into_iter()
        .filter(|sample| sample.timestamp >= start && sample.timestamp < end)
        .collect();

    debug!(
        kept = kept.len(),
        dropped = total - kept.len(),
        start = %start,
        end = %end,
        "Filtered series to selection"
    );
    kept
}
