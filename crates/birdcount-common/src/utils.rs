//! Utility functions used across the Birdcount workspace

use crate::{BirdcountError, Result, Series, Timestamp};
use chrono_tz::Tz;

/// Parse an IANA time zone name such as `Europe/Stockholm`
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim().parse::<Tz>().map_err(|e| {
        BirdcountError::validation_field(format!("Unknown time zone '{name}': {e}"), "tz_local")
    })
}

/// Format a zoned timestamp for display
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S %Z").to_string()
}

/// Index of the first sample that is not strictly after its predecessor
pub fn first_unordered_index(series: &Series) -> Option<usize> {
    series
        .windows(2)
        .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        .map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sample;
    use chrono::TimeZone;
    use chrono_tz::Europe::Stockholm;

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Europe/Stockholm").unwrap(), Stockholm);
        assert_eq!(parse_timezone(" UTC ").unwrap(), Tz::UTC);
        assert!(parse_timezone("Nowhere/Special").is_err());
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Stockholm.with_ymd_and_hms(2015, 7, 1, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2015-07-01 12:00:00 CEST");
    }

    #[test]
    fn test_first_unordered_index() {
        let t0 = Stockholm.with_ymd_and_hms(2015, 4, 1, 0, 0, 0).unwrap();
        let t1 = Stockholm.with_ymd_and_hms(2015, 4, 1, 0, 2, 0).unwrap();

        let ordered = vec![Sample::new(t0, 1), Sample::new(t1, 2)];
        assert_eq!(first_unordered_index(&ordered), None);

        let duplicated = vec![Sample::new(t0, 1), Sample::new(t1, 2), Sample::new(t1, 3)];
        assert_eq!(first_unordered_index(&duplicated), Some(2));

        assert_eq!(first_unordered_index(&Vec::new()), None);
    }
}
