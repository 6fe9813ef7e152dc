//! Default values for every configuration section.

use crate::schema::*;
use birdcount_common::{Granularity, LoggingConfig};
use std::path::PathBuf;

/// Zone the sensor's UTC timestamps are shown in.
pub const DEFAULT_TZ_LOCAL: &str = "Europe/Stockholm";

/// Sampling period of the sensor logger, with a little slack.
pub const DEFAULT_MAX_GAP_MINUTES: f64 = 2.1;

/// Most crossings the sensor can plausibly register between two readings.
pub const DEFAULT_MAX_STEP: u64 = 8;

/// Days shown when nothing else is configured.
pub const DEFAULT_DAY_SPAN: u32 = 6;

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            correction: CorrectionConfig::default(),
            view: ViewConfig::default(),
            chart: ChartConfig::default(),
            site: SiteConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("bird_data.txt"),
            tz_local: DEFAULT_TZ_LOCAL.to_string(),
        }
    }
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            variant: PipelineVariant::CorrectedOnly,
            max_gap_minutes: DEFAULT_MAX_GAP_MINUTES,
            max_step: DEFAULT_MAX_STEP,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Hour,
            start_date: None,
            day_span: DEFAULT_DAY_SPAN,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("bird_movements.png"),
            width: 1200,
            height: 600,
            title: "Bird movements in and out of the garage".to_string(),
            enable_grid: true,
            shade_daylight: true,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Södra Sandby".to_string(),
            latitude: 55.717_813,
            longitude: 13.347_003,
        }
    }
}
