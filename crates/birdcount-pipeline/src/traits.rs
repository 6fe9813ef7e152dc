//! Stage trait shared by every series correction step.

use birdcount_common::Series;

/// A pure transformation from one series to a new one.
///
/// Stages own their input and return a fresh series; a stage never fails,
/// and series shorter than two samples pass through unchanged.
pub trait SeriesStage: Send + Sync {
    /// Applies the stage.
    fn apply(&self, series: Series) -> Series;

    /// Gets the name of this stage, used in logs.
    fn name(&self) -> &'static str;

    /// Gets a one-line description of this stage.
    fn description(&self) -> &'static str;
}
