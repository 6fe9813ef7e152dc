//! Sensor log ingestion.
//!
//! The logger writes one reading per line:
//!
//! ```text
//! 2015-04-01 10:02:07.417583 70
//! ```
//!
//! Timestamps are UTC and are localized to the configured zone. Lines that
//! do not parse are skipped and counted.

use birdcount_common::{BirdcountError, Result, Sample, Series};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::convert::Infallible;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info, instrument, trace, warn};

/// Samples read from a log, plus how many lines were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadReport {
    /// Samples sorted strictly ascending by timestamp.
    pub samples: Series,
    /// Non-blank lines that could not be parsed.
    pub skipped: usize,
}

/// Parses one log line, or `None` when it is malformed.
///
/// Columns after the third are ignored.
pub fn parse_line(line: &str, tz: Tz) -> Option<Sample> {
    let mut fields = line.split_whitespace();
    let date = NaiveDate::parse_from_str(fields.next()?, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(fields.next()?, "%H:%M:%S%.f").ok()?;
    let count = fields.next()?.parse::<u64>().ok()?;

    let utc = Utc.from_utc_datetime(&NaiveDateTime::new(date, time));
    Some(Sample::new(utc.with_timezone(&tz), count))
}

/// Parses a whole log held in memory.
pub fn parse_str(text: &str, tz: Tz) -> ReadReport {
    match collect(text.lines().map(Ok::<_, Infallible>), tz) {
        Ok(report) => report,
        Err(never) => match never {},
    }
}

/// Parses a log from any buffered reader.
pub fn parse_reader<R: BufRead>(reader: R, tz: Tz) -> Result<ReadReport> {
    collect(reader.lines(), tz).map_err(BirdcountError::from)
}

/// Reads and parses a log file.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub async fn load_file<P: AsRef<Path>>(path: P, tz: Tz) -> Result<ReadReport> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        BirdcountError::with_source(format!("Failed to read sensor log {}", path.display()), e)
    })?;

    let report = parse_str(&text, tz);
    info!(
        samples = report.samples.len(),
        skipped = report.skipped,
        "Loaded sensor log"
    );
    Ok(report)
}

fn collect<I, S, E>(lines: I, tz: Tz) -> std::result::Result<ReadReport, E>
where
    I: Iterator<Item = std::result::Result<S, E>>,
    S: AsRef<str>,
{
    let mut samples = Series::new();
    let mut skipped = 0;

    for (index, line) in lines.enumerate() {
        let line = line?;
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line, tz) {
            Some(sample) => samples.push(sample),
            None => {
                trace!(line = index + 1, "Skipping malformed line");
                skipped += 1;
            }
        }
    }

    if samples.windows(2).any(|pair| pair[1].timestamp < pair[0].timestamp) {
        warn!("Sensor log is out of order, sorting by timestamp");
        samples.sort_by_key(|sample| sample.timestamp);
    }
    let before = samples.len();
    samples.dedup_by_key(|sample| sample.timestamp);
    if samples.len() < before {
        debug!(dropped = before - samples.len(), "Dropped duplicate timestamps");
    }
    if skipped > 0 {
        debug!(skipped, "Skipped malformed lines");
    }

    Ok(ReadReport { samples, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use birdcount_common::test_utils::{counts, stockholm};
    use chrono_tz::Europe::Stockholm;
    use std::io::Cursor;

    #[test]
    fn test_parse_line_localizes_utc() {
        let sample = parse_line("2015-04-01 10:02:07.417583 70", Stockholm).unwrap();
        assert_eq!(sample.count, 70);
        // UTC+2 in April.
        assert_eq!(
            sample.timestamp.naive_local().format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            "2015-04-01 12:02:07.417583"
        );
    }

    #[test]
    fn test_parse_line_accepts_whole_seconds_and_extra_columns() {
        let sample = parse_line("2015-01-25 23:30:00 12 extra columns", Stockholm).unwrap();
        assert_eq!(sample.timestamp, stockholm(2015, 1, 26, 0, 30, 0));
        assert_eq!(sample.count, 12);
    }

    #[test]
    fn test_parse_line_rejects_malformed() {
        assert!(parse_line("2015-04-01 10:02:07.417583", Stockholm).is_none());
        assert!(parse_line("2015-04-01 10:02:07.4 -3", Stockholm).is_none());
        assert!(parse_line("2015-04-01 10:02:07.4 seven", Stockholm).is_none());
        assert!(parse_line("2015-13-01 10:02:07.4 7", Stockholm).is_none());
        assert!(parse_line("yesterday noon 7", Stockholm).is_none());
    }

    #[test]
    fn test_parse_str_skips_and_counts() {
        let text = "\
2015-04-01 10:00:00.0 70
garbage line
2015-04-01 10:02:00.0 71

2015-04-01 10:04:00.0 -1
";
        let report = parse_str(text, Stockholm);
        assert_eq!(counts(&report.samples), vec![70, 71]);
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn test_sorts_and_drops_duplicates() {
        let text = "\
2015-04-01 10:04:00.0 73
2015-04-01 10:00:00.0 70
2015-04-01 10:02:00.0 71
2015-04-01 10:02:00.0 99
";
        let report = parse_str(text, Stockholm);
        assert_eq!(counts(&report.samples), vec![70, 71, 73]);
        assert!(birdcount_common::first_unordered_index(&report.samples).is_none());
    }

    #[test]
    fn test_parse_reader() {
        let input = Cursor::new("2015-04-01 10:00:00.0 70\n2015-04-01 10:02:00.0 71\n");
        let report = parse_reader(input, Stockholm).unwrap();
        assert_eq!(report.samples.len(), 2);
        assert_eq!(report.skipped, 0);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_file("/no/such/bird_data.txt", Stockholm).await.unwrap_err();
        assert!(err.to_string().contains("/no/such/bird_data.txt"));
    }
}
