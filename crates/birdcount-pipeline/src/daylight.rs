//! Sunrise and sunset for the observation site.
//!
//! Times come from the `sunrise` crate, which places the upper limb of the
//! sun at -0.833 degrees to account for refraction.

use birdcount_common::{start_of_day, Granularity, Timestamp};
use birdcount_config::SiteConfig;
use chrono::{Datelike, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::BTreeSet;
use tracing::debug;

/// Local sunrise and sunset for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    /// When the upper limb of the sun rises.
    pub sunrise: Timestamp,
    /// When the upper limb of the sun sets.
    pub sunset: Timestamp,
}

/// A shaded interval on an hourly chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaylightSpan {
    /// Start of the span.
    pub start: Timestamp,
    /// End of the span.
    pub end: Timestamp,
}

/// Sun position calculator for a fixed site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarCalculator {
    latitude: f64,
    longitude: f64,
}

impl SolarCalculator {
    /// Creates a calculator for a latitude and longitude in degrees, north and east positive.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a calculator for a configured site.
    pub const fn for_site(site: &SiteConfig) -> Self {
        Self::new(site.latitude, site.longitude)
    }

    /// Sunrise and sunset on `date`, or `None` during polar day or night.
    #[allow(deprecated)]
    pub fn sun_times(&self, date: NaiveDate, tz: Tz) -> Option<SunTimes> {
        let (rise, set) = sunrise::sunrise_sunset(
            self.latitude,
            self.longitude,
            date.year(),
            date.month(),
            date.day(),
        );
        // Without a sunrise the hour angle is undefined and both ends collapse.
        if rise >= set {
            return None;
        }
        let sunrise = unix_to_local(rise, tz)?;
        let sunset = unix_to_local(set, tz)?;
        if sunrise.date_naive().signed_duration_since(date).num_days().abs() > 1 {
            return None;
        }
        Some(SunTimes { sunrise, sunset })
    }

    /// Daylight spans to shade behind hourly bars starting at `keys`.
    ///
    /// For each date among the keys, the span runs from sunrise to sunset,
    /// both truncated to the hour and clipped to the first and last key.
    pub fn daylight_spans(&self, keys: &[Timestamp], tz: Tz) -> Vec<DaylightSpan> {
        let (Some(first), Some(last)) = (keys.iter().min(), keys.iter().max()) else {
            return Vec::new();
        };
        let dates: BTreeSet<NaiveDate> = keys.iter().map(Timestamp::date_naive).collect();

        let spans: Vec<DaylightSpan> = dates
            .into_iter()
            .filter_map(|date| {
                let day_start = start_of_day(tz, date)?;
                let day_end = start_of_day(tz, date.checked_add_days(Days::new(1))?)?;
                if day_start >= *last || day_end <= *first {
                    return None;
                }
                let sun = self.sun_times(date, tz)?;
                let start = Granularity::Hour.truncate(&sun.sunrise).max(*first);
                let end = Granularity::Hour.truncate(&sun.sunset).min(*last);
                (start < end).then_some(DaylightSpan { start, end })
            })
            .collect();

        debug!(spans = spans.len(), "Computed daylight spans");
        spans
    }
}

impl Default for SolarCalculator {
    fn default() -> Self {
        Self::for_site(&SiteConfig::default())
    }
}

fn unix_to_local(seconds: i64, tz: Tz) -> Option<Timestamp> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(|utc| utc.with_timezone(&tz))
}
