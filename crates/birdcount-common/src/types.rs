//! Common type definitions for sensor samples and chart granularity.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeDelta, TimeZone, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{BirdcountError, Result};

/// Zoned timestamp used throughout the pipeline.
pub type Timestamp = DateTime<Tz>;

/// One cumulative reading from the garage sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// When the reading was logged, localized to the configured zone.
    pub timestamp: Timestamp,
    /// Total crossings the sensor has counted so far.
    pub count: u64,
}

impl Sample {
    /// Creates a new sample.
    pub const fn new(timestamp: Timestamp, count: u64) -> Self {
        Self { timestamp, count }
    }

    /// Returns a copy of this sample carrying a different count.
    #[must_use]
    pub const fn with_count(self, count: u64) -> Self {
        Self {
            timestamp: self.timestamp,
            count,
        }
    }
}

/// An ordered sequence of samples, ascending by timestamp.
pub type Series = Vec<Sample>;

/// Crossings attributed to the later sample of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    /// Timestamp of the sample that closed the step.
    pub timestamp: Timestamp,
    /// Clamped increase of the cumulative count over the step.
    pub amount: u64,
}

/// Width of the time windows a chart aggregates movements into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per clock hour.
    Hour,
    /// One bucket per local calendar day.
    Day,
    /// One bucket per week, starting Monday.
    Week,
}

impl Granularity {
    /// All granularities, finest first.
    pub const ALL: [Self; 3] = [Self::Hour, Self::Day, Self::Week];

    /// Truncates a timestamp to the start of the window containing it.
    ///
    /// Day and week windows start at the first local instant of their date,
    /// so a window can be 23 or 25 hours long across a daylight saving
    /// transition.
    pub fn truncate(self, timestamp: &Timestamp) -> Timestamp {
        match self {
            Self::Hour => {
                let into_hour = TimeDelta::seconds(i64::from(
                    timestamp.minute() * 60 + timestamp.second(),
                )) + TimeDelta::nanoseconds(i64::from(timestamp.nanosecond()));
                *timestamp - into_hour
            }
            Self::Day => start_of_day(timestamp.timezone(), timestamp.date_naive())
                .unwrap_or(*timestamp),
            Self::Week => {
                let date = timestamp.date_naive();
                let monday = date
                    .checked_sub_days(Days::new(u64::from(
                        date.weekday().num_days_from_monday(),
                    )))
                    .unwrap_or(date);
                start_of_day(timestamp.timezone(), monday).unwrap_or(*timestamp)
            }
        }
    }

    /// Start of the window following the one that starts at `key`.
    pub fn next_window(self, key: &Timestamp) -> Timestamp {
        let days_later = |days: u64, fallback: TimeDelta| {
            key.date_naive()
                .checked_add_days(Days::new(days))
                .and_then(|date| start_of_day(key.timezone(), date))
                .unwrap_or(*key + fallback)
        };
        match self {
            Self::Hour => *key + TimeDelta::hours(1),
            Self::Day => days_later(1, TimeDelta::days(1)),
            Self::Week => days_later(7, TimeDelta::weeks(1)),
        }
    }

    /// Axis label for a bucket starting at `key`.
    ///
    /// Hourly labels are sparse: the date at 01:00, `HH:MM` on even hours,
    /// nothing otherwise. Weeks are numbered `00` to `53`, with week `01`
    /// starting on the first Monday of the year.
    pub fn label(self, key: &Timestamp) -> String {
        match self {
            Self::Hour => {
                if key.hour() == 1 {
                    key.format("%Y-%m-%d").to_string()
                } else if key.hour() % 2 == 0 {
                    key.format("%H:%M").to_string()
                } else {
                    String::new()
                }
            }
            Self::Day => key.format("%Y-%m-%d").to_string(),
            Self::Week => format!("week number {}", key.format("%W")),
        }
    }

    /// Bar width in days used when drawing a bucket of this granularity.
    pub const fn bar_width(self) -> f64 {
        match self {
            Self::Hour => 0.03,
            Self::Day => 0.6,
            Self::Week => 3.0,
        }
    }

    /// Short token accepted on the command line and at the prompt.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Hour => "h",
            Self::Day => "d",
            Self::Week => "w",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
        };
        f.write_str(name)
    }
}

impl FromStr for Granularity {
    type Err = BirdcountError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "hour" | "hours" | "hourly" => Ok(Self::Hour),
            "d" | "day" | "days" | "daily" => Ok(Self::Day),
            "w" | "week" | "weeks" | "weekly" => Ok(Self::Week),
            other => Err(BirdcountError::validation_field(
                format!("Unknown interval '{other}', expected h, d or w"),
                "granularity",
            )),
        }
    }
}

/// Which window of the data to chart and how to bucket it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// First instant included in the chart.
    pub start: Timestamp,
    /// Number of calendar days shown, counted from `start`.
    pub day_span: u32,
    /// Bucket width.
    pub granularity: Granularity,
}

impl Selection {
    /// Builds a selection starting at the first local instant of `start_date`.
    pub fn from_date(
        tz: Tz,
        start_date: NaiveDate,
        day_span: u32,
        granularity: Granularity,
    ) -> Result<Self> {
        if day_span == 0 {
            return Err(BirdcountError::validation_field(
                "Number of days must be positive",
                "day_span",
            ));
        }
        let start = start_of_day(tz, start_date).ok_or_else(|| {
            BirdcountError::validation_field(
                format!("{start_date} cannot be resolved in {tz}"),
                "start_date",
            )
        })?;
        Ok(Self {
            start,
            day_span,
            granularity,
        })
    }

    /// Exclusive end of the selected range.
    pub fn end(&self) -> Timestamp {
        self.start
            .date_naive()
            .checked_add_days(Days::new(u64::from(self.day_span)))
            .and_then(|date| start_of_day(self.start.timezone(), date))
            .unwrap_or_else(|| self.start + TimeDelta::days(i64::from(self.day_span)))
    }

    /// Whether `timestamp` falls inside `[start, end)`.
    pub fn contains(&self, timestamp: &Timestamp) -> bool {
        *timestamp >= self.start && *timestamp < self.end()
    }
}

/// First instant of `date` in `tz`.
///
/// This is local midnight unless a transition skips it, in which case the
/// day starts at the first wall-clock minute after the gap.
pub fn start_of_day(tz: Tz, date: NaiveDate) -> Option<Timestamp> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    (0..MINUTES_PER_DAY).find_map(|minute| {
        tz.from_local_datetime(&(midnight + TimeDelta::minutes(minute)))
            .earliest()
    })
}

const MINUTES_PER_DAY: i64 = 24 * 60;
