//! Configuration schema definitions using serde.

use birdcount_common::{parse_timezone, Granularity, LoggingConfig, Result, Selection};
use chrono::{NaiveDate, TimeDelta};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Main configuration structure for Birdcount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sensor log location and time zone.
    pub input: InputConfig,
    /// Correction stage parameters.
    pub correction: CorrectionConfig,
    /// Which part of the data to chart.
    pub view: ViewConfig,
    /// Chart output.
    pub chart: ChartConfig,
    /// Observation site, used for daylight shading.
    pub site: SiteConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Sensor log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Path of the whitespace-separated sensor log.
    pub data_path: PathBuf,
    /// IANA zone the UTC timestamps are localized to.
    pub tz_local: String,
}

/// Correction pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    /// Which stages run before aggregation.
    pub variant: PipelineVariant,
    /// Longest allowed interval between samples before gap filling kicks in.
    pub max_gap_minutes: f64,
    /// Largest plausible increase of the cumulative count in one step.
    pub max_step: u64,
}

impl CorrectionConfig {
    /// The gap threshold as a duration, rounded to the millisecond.
    #[allow(clippy::cast_possible_truncation)]
    pub fn max_gap(&self) -> TimeDelta {
        TimeDelta::milliseconds((self.max_gap_minutes * 60_000.0).round() as i64)
    }
}

/// The two compositions of correction stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineVariant {
    /// Dip correction only.
    CorrectedOnly,
    /// Dip correction, gap filling and rate limiting.
    Full,
}

impl fmt::Display for PipelineVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CorrectedOnly => "corrected_only",
            Self::Full => "full",
        })
    }
}

impl FromStr for PipelineVariant {
    type Err = birdcount_common::BirdcountError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "corrected_only" | "corrected" => Ok(Self::CorrectedOnly),
            "full" => Ok(Self::Full),
            other => Err(birdcount_common::BirdcountError::validation_field(
                format!("Unknown pipeline variant '{other}', expected corrected_only or full"),
                "variant",
            )),
        }
    }
}

/// Chart selection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Bucket width.
    pub granularity: Granularity,
    /// First day shown; when absent the user is prompted.
    pub start_date: Option<NaiveDate>,
    /// Number of days shown.
    pub day_span: u32,
}

/// Chart rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Where the PNG is written.
    pub output_path: PathBuf,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Chart caption.
    pub title: String,
    /// Whether to draw grid lines.
    pub enable_grid: bool,
    /// Whether hourly charts shade the hours between sunrise and sunset.
    pub shade_daylight: bool,
}

/// Observation site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Display name of the site.
    pub name: String,
    /// Latitude in degrees, north positive.
    pub latitude: f64,
    /// Longitude in degrees, east positive.
    pub longitude: f64,
}

impl Config {
    /// The configured local time zone.
    pub fn timezone(&self) -> Result<Tz> {
        parse_timezone(&self.input.tz_local)
    }

    /// The chart selection, if a start date is configured.
    pub fn selection(&self) -> Option<Result<Selection>> {
        let start_date = self.view.start_date?;
        Some(self.timezone().and_then(|tz| {
            Selection::from_date(tz, start_date, self.view.day_span, self.view.granularity)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_gap_duration() {
        let correction = CorrectionConfig {
            max_gap_minutes: 2.1,
            ..CorrectionConfig::default()
        };
        assert_eq!(correction.max_gap(), TimeDelta::seconds(126));
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("full".parse::<PipelineVariant>().unwrap(), PipelineVariant::Full);
        assert_eq!(
            "corrected-only".parse::<PipelineVariant>().unwrap(),
            PipelineVariant::CorrectedOnly
        );
        assert!("everything".parse::<PipelineVariant>().is_err());
        assert_eq!(PipelineVariant::CorrectedOnly.to_string(), "corrected_only");
    }

    #[test]
    fn test_selection_requires_start_date() {
        let mut config = Config::default();
        assert!(config.selection().is_none());

        config.view.start_date = NaiveDate::from_ymd_opt(2015, 4, 1);
        let selection = config.selection().unwrap().unwrap();
        assert_eq!(selection.day_span, config.view.day_span);
        assert_eq!(selection.granularity, config.view.granularity);
    }
}
