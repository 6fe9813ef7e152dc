//! PNG bar chart rendering with plotters.

use crate::daylight::DaylightSpan;
use crate::pipeline::ChartData;
use birdcount_common::{BirdcountError, Result, Timestamp};
use birdcount_config::ChartConfig;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;
use std::path::Path;
use tracing::info;

const MS_PER_DAY: f64 = 86_400_000.0;
const Y_AXIS_LABEL: &str = "Movements in and out";
const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);
const DAYLIGHT_COLOR: RGBColor = RGBColor(255, 255, 224);
const DAYLIGHT_ALPHA: f64 = 0.3;

/// Draws chart data as a bar chart, one bar per bucket.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
    title: String,
    enable_grid: bool,
}

impl ChartRenderer {
    /// Creates a renderer from the chart configuration.
    pub fn new(config: &ChartConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            title: config.title.clone(),
            enable_grid: config.enable_grid,
        }
    }

    /// Renders `data` to a PNG at `path`, shading `daylight` behind the bars.
    pub fn render_to_file(
        &self,
        data: &ChartData,
        daylight: &[DaylightSpan],
        path: &Path,
    ) -> Result<()> {
        if data.is_empty() {
            return Err(BirdcountError::render(
                "No movements in the selected range, nothing to draw",
            ));
        }

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        self.draw(&root, data, daylight)?;
        root.present()?;

        info!(
            path = %path.display(),
            buckets = data.points.len(),
            "Rendered bird movement chart"
        );
        Ok(())
    }

    fn draw<DB>(
        &self,
        root: &DrawingArea<DB, Shift>,
        data: &ChartData,
        daylight: &[DaylightSpan],
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;

        let Some(origin) = data.points.first().map(|point| point.start) else {
            return Ok(());
        };
        let offsets = x_offsets(data);
        let half_width = data.bar_width / 2.0;
        let top = y_top(data);

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(90)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range(&offsets, data.bar_width), 0.0..top)?;

        let blank = |_: &f64| String::new();
        let mut mesh = chart.configure_mesh();
        mesh.x_label_formatter(&blank)
            .y_desc(Y_AXIS_LABEL)
            .disable_x_mesh();
        if !self.enable_grid {
            mesh.disable_y_mesh();
        }
        mesh.draw()?;

        chart.draw_series(daylight.iter().map(|span| {
            Rectangle::new(
                [
                    (days_between(&origin, &span.start), 0.0),
                    (days_between(&origin, &span.end), top),
                ],
                DAYLIGHT_COLOR.mix(DAYLIGHT_ALPHA).filled(),
            )
        }))?;

        chart.draw_series(data.points.iter().zip(&offsets).map(|(point, &x)| {
            #[allow(clippy::cast_precision_loss)]
            let height = point.movements as f64;
            Rectangle::new(
                [(x - half_width, 0.0), (x + half_width, height)],
                BAR_COLOR.filled(),
            )
        }))?;

        let tick_style = TextStyle::from(("sans-serif", 12).into_font())
            .transform(FontTransform::Rotate90)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for (point, &x) in data.points.iter().zip(&offsets) {
            if point.label.is_empty() {
                continue;
            }
            let (px, py) = chart.backend_coord(&(x, 0.0));
            root.draw(&Text::new(point.label.as_str(), (px, py + 6), tick_style.clone()))?;
        }

        Ok(())
    }
}

/// Fractional days from `origin` to `timestamp`.
#[allow(clippy::cast_precision_loss)]
fn days_between(origin: &Timestamp, timestamp: &Timestamp) -> f64 {
    (*timestamp - *origin).num_milliseconds() as f64 / MS_PER_DAY
}

/// Bar positions in days since the first bucket.
fn x_offsets(data: &ChartData) -> Vec<f64> {
    let Some(origin) = data.points.first().map(|point| point.start) else {
        return Vec::new();
    };
    data.points
        .iter()
        .map(|point| days_between(&origin, &point.start))
        .collect()
}

/// X axis range leaving a bar width of room on both sides.
fn x_range(offsets: &[f64], bar_width: f64) -> Range<f64> {
    let last = offsets.last().copied().unwrap_or(0.0);
    -bar_width..last + bar_width
}

/// Y axis top with a tenth of headroom over the tallest bar.
#[allow(clippy::cast_precision_loss)]
fn y_top(data: &ChartData) -> f64 {
    let tallest = data
        .points
        .iter()
        .map(|point| point.movements)
        .max()
        .unwrap_or(0);
    (tallest as f64 * 1.1).max(1.0)
}
