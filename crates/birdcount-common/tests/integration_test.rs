//! Integration tests for birdcount-common crate.

use birdcount_common::{
    format_timestamp, parse_timezone, BirdcountError, Granularity, Sample, Selection,
};
use chrono::{NaiveDate, TimeZone};

#[test]
fn test_selection_in_configured_zone() {
    let tz = parse_timezone("Europe/Stockholm").unwrap();
    let date = NaiveDate::from_ymd_opt(2015, 3, 28).unwrap();
    let selection = Selection::from_date(tz, date, 2, Granularity::Day).unwrap();

    // The range spans the spring transition, so it is one hour short of 48.
    assert_eq!((selection.end() - selection.start).num_hours(), 47);
    assert_eq!(format_timestamp(&selection.start), "2015-03-28 00:00:00 CET");
}

#[test]
fn test_every_granularity_truncates_idempotently() {
    let tz = parse_timezone("Europe/Stockholm").unwrap();
    let ts = tz.with_ymd_and_hms(2015, 11, 18, 17, 23, 5).unwrap();

    for granularity in Granularity::ALL {
        let key = granularity.truncate(&ts);
        assert!(key <= ts);
        assert!(granularity.next_window(&key) > ts);
        assert_eq!(granularity.truncate(&key), key);
    }
}

#[test]
fn test_granularity_display_round_trips_through_parse() {
    for granularity in Granularity::ALL {
        let parsed: Granularity = granularity.to_string().parse().unwrap();
        assert_eq!(parsed, granularity);
        let from_token: Granularity = granularity.token().parse().unwrap();
        assert_eq!(from_token, granularity);
    }
}

#[test]
fn test_unknown_zone_is_a_validation_error() {
    let err = parse_timezone("Garage/Birds").unwrap_err();
    assert!(matches!(err, BirdcountError::Validation { .. }));
}

#[test]
fn test_sample_is_copy() {
    let tz = parse_timezone("UTC").unwrap();
    let sample = Sample::new(tz.with_ymd_and_hms(2015, 1, 25, 0, 0, 0).unwrap(), 3);
    let copy = sample;
    assert_eq!(sample, copy);
}
