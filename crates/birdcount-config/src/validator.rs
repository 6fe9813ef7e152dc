//! Runtime validation of a loaded configuration.

use crate::schema::Config;
use birdcount_common::{parse_timezone, BirdcountError, Result};

/// Upper bound on the gap threshold; anything longer would hide whole days of missing data.
const MAX_GAP_MINUTES_LIMIT: f64 = 24.0 * 60.0;

impl Config {
    /// Validates the configuration, reporting the first offending field.
    pub fn validate(&self) -> Result<()> {
        validate_timezone(&self.input.tz_local)?;
        validate_max_gap(self.correction.max_gap_minutes)?;
        validate_max_step(self.correction.max_step)?;
        validate_day_span(self.view.day_span)?;

        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(BirdcountError::validation_field(
                format!(
                    "Chart size must be non-zero, got {}x{}",
                    self.chart.width, self.chart.height
                ),
                "chart",
            ));
        }

        validate_coordinates(self.site.latitude, self.site.longitude)
    }
}

/// Validate an IANA time zone name
pub fn validate_timezone(timezone: &str) -> Result<()> {
    if timezone.trim().is_empty() {
        return Err(BirdcountError::validation_field(
            "Time zone cannot be empty",
            "tz_local",
        ));
    }
    parse_timezone(timezone).map(|_| ())
}

/// Validate the gap-filling threshold in minutes
pub fn validate_max_gap(minutes: f64) -> Result<()> {
    if minutes.is_finite() && minutes > 0.0 && minutes <= MAX_GAP_MINUTES_LIMIT {
        Ok(())
    } else {
        Err(BirdcountError::validation_field(
            format!("max_gap_minutes must be in (0, {MAX_GAP_MINUTES_LIMIT}], got {minutes}"),
            "max_gap_minutes",
        ))
    }
}

/// Validate the per-step clamp
pub fn validate_max_step(max_step: u64) -> Result<()> {
    if max_step == 0 {
        return Err(BirdcountError::validation_field(
            "max_step must be positive",
            "max_step",
        ));
    }
    Ok(())
}

/// Validate the number of days shown
pub fn validate_day_span(day_span: u32) -> Result<()> {
    if day_span == 0 {
        return Err(BirdcountError::validation_field(
            "day_span must be positive",
            "day_span",
        ));
    }
    Ok(())
}

/// Validate site latitude and longitude in degrees
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(BirdcountError::validation_field(
            format!("Latitude {latitude} is outside [-90, 90]"),
            "site.latitude",
        ));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(BirdcountError::validation_field(
            format!("Longitude {longitude} is outside [-180, 180]"),
            "site.longitude",
        ));
    }
    Ok(())
}
