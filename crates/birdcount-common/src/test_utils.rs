//! Test utilities and shared test helpers for Birdcount.
//!
//! Fixtures and property-test strategies shared by the unit and integration
//! tests of every crate in the workspace. Enabled with the `testing` feature.

use crate::{Sample, Series, Timestamp};
use chrono::{TimeDelta, TimeZone};
use chrono_tz::Europe::Stockholm;
use proptest::prelude::*;
use std::sync::Once;

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));

        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Test fixture for a Stockholm wall-clock timestamp.
pub fn stockholm(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Timestamp {
    Stockholm
        .with_ymd_and_hms(year, month, day, hour, min, sec)
        .earliest()
        .expect("fixture timestamp must exist in Europe/Stockholm")
}

/// Builds a series with one sample every `step_secs` seconds from `start`.
pub fn series_from_counts(start: Timestamp, step_secs: i64, counts: &[u64]) -> Series {
    counts
        .iter()
        .zip(0_i32..)
        .map(|(&count, i)| Sample::new(start + TimeDelta::seconds(step_secs * i64::from(i)), count))
        .collect()
}

/// Builds a series from `(seconds after start, count)` pairs.
pub fn series_at_offsets(start: Timestamp, points: &[(i64, u64)]) -> Series {
    points
        .iter()
        .map(|&(offset, count)| Sample::new(start + TimeDelta::seconds(offset), count))
        .collect()
}

/// The counts of a series, for compact assertions.
pub fn counts(series: &Series) -> Vec<u64> {
    series.iter().map(|sample| sample.count).collect()
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Property-test strategies for sensor data.
pub mod strategies {
    use super::*;

    /// Raw cumulative counts as a noisy sensor reports them: mostly rising,
    /// with dips, resets and spikes.
    pub fn raw_counts(max_len: usize) -> impl Strategy<Value = Vec<u64>> {
        prop::collection::vec(0_u64..500, 0..max_len)
    }

    /// Strictly increasing second offsets with irregular gaps of up to `max_step_secs`.
    pub fn offsets(len: usize, max_step_secs: i64) -> impl Strategy<Value = Vec<i64>> {
        prop::collection::vec(1..=max_step_secs, len).prop_map(|steps| {
            steps
                .into_iter()
                .scan(0_i64, |acc, step| {
                    let at = *acc;
                    *acc += step;
                    Some(at)
                })
                .collect()
        })
    }

    /// A series of up to `max_len` samples starting 2015-04-01 00:00 Stockholm,
    /// spaced irregularly by up to `max_step_secs` seconds.
    pub fn series(max_len: usize, max_step_secs: i64) -> impl Strategy<Value = Series> {
        raw_counts(max_len).prop_flat_map(move |counts| {
            let len = counts.len();
            offsets(len, max_step_secs).prop_map(move |offsets| {
                let start = stockholm(2015, 4, 1, 0, 0, 0);
                let points: Vec<(i64, u64)> =
                    offsets.into_iter().zip(counts.iter().copied()).collect();
                series_at_offsets(start, &points)
            })
        })
    }
}
