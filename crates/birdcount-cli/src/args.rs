//! Command line arguments.

use birdcount_common::Granularity;
use birdcount_config::{Config, PipelineVariant};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Plot bird movements in and out of the garage.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Sensor log to read
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// First day to chart, YYYY-MM-DD
    #[arg(short, long)]
    pub start: Option<NaiveDate>,

    /// Number of days to chart
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: Option<u32>,

    /// Bucket width: h, d or w
    #[arg(short, long)]
    pub interval: Option<Granularity>,

    /// Correction stages to run: corrected_only or full
    #[arg(long)]
    pub variant: Option<PipelineVariant>,

    /// Where to write the PNG
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print bucket data as JSON instead of drawing a chart
    #[arg(long)]
    pub json: bool,

    /// Ask for the start date, interval and day count even if configured
    #[arg(long)]
    pub interactive: bool,

    /// Log level
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Overrides configuration values with the ones given on the command line.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(data) = &self.data {
            config.input.data_path.clone_from(data);
        }
        if let Some(start) = self.start {
            config.view.start_date = Some(start);
        }
        if let Some(days) = self.days {
            config.view.day_span = days;
        }
        if let Some(interval) = self.interval {
            config.view.granularity = interval;
        }
        if let Some(variant) = self.variant {
            config.correction.variant = variant;
        }
        if let Some(output) = &self.output {
            config.chart.output_path.clone_from(output);
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}
