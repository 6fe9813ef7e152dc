//! # Birdcount Pipeline
//!
//! Correction and aggregation of garage bird-sensor counts.
//!
//! A raw cumulative series flows through the correction stages
//! ([`OutlierCorrector`], then optionally [`GapFiller`] and [`RateLimiter`]),
//! is cut to the selected date range, turned into per-step movements and
//! summed into hour, day or week buckets. The result is labelled
//! [`ChartData`] that the [`ChartRenderer`] draws as a PNG.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod daylight;
pub mod gap_fill;
pub mod labels;
pub mod movement;
pub mod outlier;
pub mod pipeline;
pub mod rate_limit;
pub mod reader;
pub mod renderer;
pub mod traits;

pub use aggregator::{Aggregation, Aggregator};
pub use daylight::{DaylightSpan, SolarCalculator, SunTimes};
pub use gap_fill::GapFiller;
pub use labels::LabelGenerator;
pub use movement::{clamped_step, derive_movements, filter_range};
pub use outlier::OutlierCorrector;
pub use pipeline::{BucketPoint, ChartData, CorrectionPipeline};
pub use rate_limit::RateLimiter;
pub use reader::{load_file, parse_line, parse_reader, parse_str, ReadReport};
pub use renderer::ChartRenderer;
pub use traits::SeriesStage;
