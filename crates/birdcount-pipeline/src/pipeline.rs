//! Composition of the correction stages with range filtering and aggregation.

use crate::aggregator::{Aggregation, Aggregator};
use crate::gap_fill::GapFiller;
use crate::labels::LabelGenerator;
use crate::movement::{derive_movements, filter_range};
use crate::outlier::OutlierCorrector;
use crate::rate_limit::RateLimiter;
use crate::traits::SeriesStage;
use birdcount_common::{
    first_unordered_index, BirdcountError, Granularity, Result, Selection, Series, Timestamp,
};
use birdcount_config::{CorrectionConfig, PipelineVariant};
use serde::{Serialize, Serializer};
use tracing::{debug, info, instrument};

/// One bar of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketPoint {
    /// Start of the bucket.
    #[serde(serialize_with = "serialize_rfc3339")]
    pub start: Timestamp,
    /// Movements summed over the bucket.
    pub movements: u64,
    /// Tick label, possibly empty.
    pub label: String,
}

/// Everything the renderer needs, in ascending bucket order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// Bucket width.
    pub granularity: Granularity,
    /// Display bar width in days.
    pub bar_width: f64,
    /// Buckets in ascending order of start.
    pub points: Vec<BucketPoint>,
}

impl ChartData {
    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of movements over all buckets.
    pub fn total_movements(&self) -> u64 {
        self.points.iter().map(|point| point.movements).sum()
    }

    /// Bucket starts in ascending order.
    pub fn keys(&self) -> Vec<Timestamp> {
        self.points.iter().map(|point| point.start).collect()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<Aggregation> for ChartData {
    fn from(aggregation: Aggregation) -> Self {
        let labels = LabelGenerator::new(aggregation.granularity).labels(aggregation.keys());
        let points = aggregation
            .buckets
            .into_iter()
            .zip(labels)
            .map(|((start, movements), label)| BucketPoint {
                start,
                movements,
                label,
            })
            .collect();

        Self {
            granularity: aggregation.granularity,
            bar_width: aggregation.granularity.bar_width(),
            points,
        }
    }
}

fn serialize_rfc3339<S: Serializer>(
    timestamp: &Timestamp,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339())
}

/// Ordered correction stages followed by filtering, aggregation and labelling.
pub struct CorrectionPipeline {
    stages: Vec<Box<dyn SeriesStage>>,
    max_step: u64,
}

impl CorrectionPipeline {
    /// An empty pipeline; movements are still clamped to `max_step`.
    pub fn new(max_step: u64) -> Self {
        Self {
            stages: Vec::new(),
            max_step,
        }
    }

    /// Appends a stage.
    #[must_use]
    pub fn with_stage<S: SeriesStage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Builds the stage list for the configured variant.
    pub fn for_variant(config: &CorrectionConfig) -> Self {
        let pipeline = Self::new(config.max_step).with_stage(OutlierCorrector::new());
        match config.variant {
            PipelineVariant::CorrectedOnly => pipeline,
            PipelineVariant::Full => pipeline
                .with_stage(GapFiller::new(config.max_gap()))
                .with_stage(RateLimiter::new(config.max_step)),
        }
    }

    /// Names of the stages in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Clamp applied when deriving movements.
    pub const fn max_step(&self) -> u64 {
        self.max_step
    }

    /// Runs every correction stage in order.
    ///
    /// Fails only when the input is not strictly ascending by timestamp.
    pub fn correct(&self, series: Series) -> Result<Series> {
        if let Some(index) = first_unordered_index(&series) {
            return Err(BirdcountError::UnsortedSeries { index });
        }

        Ok(self.stages.iter().fold(series, |series, stage| {
            let before = series.len();
            let corrected = stage.apply(series);
            debug!(
                stage = stage.name(),
                before,
                after = corrected.len(),
                "Applied correction stage"
            );
            corrected
        }))
    }

    /// Corrects `series` and aggregates the selected window into chart data.
    #[instrument(
        skip(self, series, selection),
        fields(samples = series.len(), granularity = %selection.granularity)
    )]
    pub fn run(&self, series: Series, selection: &Selection) -> Result<ChartData> {
        let corrected = self.correct(series)?;
        let selected = filter_range(corrected, selection);
        let movements = derive_movements(&selected, self.max_step);
        let aggregation = Aggregator::new(selection.granularity).aggregate(&movements);

        let chart = ChartData::from(aggregation);
        info!(
            buckets = chart.points.len(),
            movements = chart.total_movements(),
            "Pipeline finished"
        );
        Ok(chart)
    }
}

impl std::fmt::Debug for CorrectionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrectionPipeline")
            .field("stages", &self.stage_names())
            .field("max_step", &self.max_step)
            .finish()
    }
}
