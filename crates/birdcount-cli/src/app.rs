//! Application flow: configuration, loading, selection, pipeline, output.

use crate::args::Args;
use crate::error::{CliError, CliResult};
use crate::prompt::{prompt_on_terminal, DateBounds, SelectionAnswers};
use birdcount_common::{BirdcountError, Granularity, Sample, Selection, Series};
use birdcount_config::{Config, ConfigLoader};
use birdcount_pipeline::{load_file, ChartData, ChartRenderer, CorrectionPipeline, SolarCalculator};
use chrono_tz::Tz;
use std::path::PathBuf;
use tracing::{debug, info};

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Bucket data rendered as JSON.
    Json(String),
    /// Path of the written chart.
    Chart(PathBuf),
}

/// The command line application.
#[derive(Debug)]
pub struct App {
    config: Config,
    tz: Tz,
    interactive: bool,
    json: bool,
}

impl App {
    /// Loads configuration and applies the command line on top of it.
    pub fn new(args: &Args) -> CliResult<Self> {
        let mut config = ConfigLoader::load(args.config.as_deref())?;
        args.apply_to(&mut config);
        config.validate()?;
        let tz = config.timezone()?;

        Ok(Self {
            config,
            tz,
            interactive: args.interactive,
            json: args.json,
        })
    }

    /// The effective configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the chart window has to be asked for.
    pub const fn needs_prompt(&self) -> bool {
        self.interactive || self.config.view.start_date.is_none()
    }

    /// Runs the whole flow, prompting on the terminal when needed.
    pub async fn run(&self) -> CliResult<Outcome> {
        let samples = self.load_samples().await?;

        let selection = if self.needs_prompt() {
            let bounds = date_bounds(&samples).ok_or_else(|| self.no_data())?;
            let site = self.config.site.name.clone();
            let answers =
                tokio::task::spawn_blocking(move || prompt_on_terminal(&site, bounds)).await??;
            self.selection_from(answers)?
        } else {
            self.configured_selection()?
        };

        self.produce(samples, &selection).await
    }

    /// Reads the sensor log, failing if it holds no samples.
    pub async fn load_samples(&self) -> CliResult<Series> {
        let path = &self.config.input.data_path;
        let report = load_file(path, self.tz).await?;
        if report.samples.is_empty() {
            return Err(self.no_data());
        }
        Ok(report.samples)
    }

    /// The selection given by configuration and arguments.
    pub fn configured_selection(&self) -> CliResult<Selection> {
        match self.config.selection() {
            Some(selection) => Ok(selection?),
            None => Err(BirdcountError::validation_field(
                "No start date given",
                "start_date",
            )
            .into()),
        }
    }

    /// Builds a selection from prompted answers.
    pub fn selection_from(&self, answers: SelectionAnswers) -> CliResult<Selection> {
        Ok(Selection::from_date(
            self.tz,
            answers.start_date,
            answers.day_span,
            answers.granularity,
        )?)
    }

    /// Runs the pipeline and writes JSON or a chart.
    pub async fn produce(&self, samples: Series, selection: &Selection) -> CliResult<Outcome> {
        let pipeline = CorrectionPipeline::for_variant(&self.config.correction);
        debug!(?pipeline, "Built correction pipeline");
        let chart = pipeline.run(samples, selection)?;

        if self.json {
            return Ok(Outcome::Json(chart.to_json()?));
        }
        self.render(chart).await
    }

    async fn render(&self, chart: ChartData) -> CliResult<Outcome> {
        let daylight = if chart.granularity == Granularity::Hour && self.config.chart.shade_daylight
        {
            SolarCalculator::for_site(&self.config.site).daylight_spans(&chart.keys(), self.tz)
        } else {
            Vec::new()
        };

        let renderer = ChartRenderer::new(&self.config.chart);
        let path = self.config.chart.output_path.clone();
        let output = path.clone();
        tokio::task::spawn_blocking(move || renderer.render_to_file(&chart, &daylight, &output))
            .await??;

        info!(path = %path.display(), "Chart written");
        Ok(Outcome::Chart(path))
    }

    fn no_data(&self) -> CliError {
        CliError::NoData(self.config.input.data_path.clone())
    }
}

/// First and last local date of a series.
pub fn date_bounds(samples: &[Sample]) -> Option<DateBounds> {
    Some(DateBounds {
        first: samples.first()?.timestamp.date_naive(),
        last: samples.last()?.timestamp.date_naive(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use birdcount_common::test_utils::{series_from_counts, stockholm};
    use chrono::NaiveDate;

    fn app(args: &[&str]) -> App {
        let mut argv = vec!["birdcount"];
        argv.extend_from_slice(args);
        App::new(&<Args as clap::Parser>::try_parse_from(argv).unwrap()).unwrap()
    }

    #[test]
    fn test_prompt_needed_without_start_date() {
        assert!(app(&[]).needs_prompt());
        assert!(!app(&["--start", "2015-04-01"]).needs_prompt());
        assert!(app(&["--start", "2015-04-01", "--interactive"]).needs_prompt());
    }

    #[test]
    fn test_configured_selection_uses_arguments() {
        let app = app(&["--start", "2015-04-01", "--days", "2", "--interval", "d"]);
        let selection = app.configured_selection().unwrap();

        assert_eq!(selection.start, stockholm(2015, 4, 1, 0, 0, 0));
        assert_eq!(selection.day_span, 2);
        assert_eq!(selection.granularity, Granularity::Day);
    }

    #[test]
    fn test_configured_selection_requires_start_date() {
        let err = app(&[]).configured_selection().unwrap_err();
        assert!(matches!(err, CliError::Birdcount(ref inner) if inner.field() == Some("start_date")));
    }

    #[test]
    fn test_date_bounds() {
        let samples = series_from_counts(stockholm(2015, 4, 1, 23, 0, 0), 3600, &[1, 2, 3]);
        let bounds = date_bounds(&samples).unwrap();
        assert_eq!(bounds.first, NaiveDate::from_ymd_opt(2015, 4, 1).unwrap());
        assert_eq!(bounds.last, NaiveDate::from_ymd_opt(2015, 4, 2).unwrap());
        assert!(date_bounds(&[]).is_none());
    }
}
