//! Bucketed aggregation of movements.

use birdcount_common::{Granularity, Movement, Timestamp};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Movements summed per bucket, keyed by bucket start.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Width of every bucket.
    pub granularity: Granularity,
    /// Summed movements, iterated in ascending key order.
    pub buckets: BTreeMap<Timestamp, u64>,
}

impl Aggregation {
    /// Display bar width in days for this aggregation's granularity.
    pub const fn bar_width(&self) -> f64 {
        self.granularity.bar_width()
    }

    /// Bucket starts in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &Timestamp> {
        self.buckets.keys()
    }

    /// Sum over all buckets.
    pub fn total(&self) -> u64 {
        self.buckets.values().sum()
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no bucket received a movement.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Sums movements into hour, day or week buckets.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    granularity: Granularity,
}

impl Aggregator {
    /// Creates an aggregator for the given bucket width.
    pub const fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    /// The bucket width.
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Adds every movement to the bucket its timestamp truncates to.
    #[instrument(
        skip(self, movements),
        fields(granularity = %self.granularity, movements = movements.len())
    )]
    pub fn aggregate(&self, movements: &[Movement]) -> Aggregation {
        let buckets = movements
            .iter()
            .fold(BTreeMap::new(), |mut buckets, movement| {
                *buckets
                    .entry(self.granularity.truncate(&movement.timestamp))
                    .or_insert(0) += movement.amount;
                buckets
            });

        debug!(buckets = buckets.len(), "Aggregated movements");
        Aggregation {
            granularity: self.granularity,
            buckets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use birdcount_common::test_utils::stockholm;

    fn movement(timestamp: Timestamp, amount: u64) -> Movement {
        Movement { timestamp, amount }
    }

    #[test]
    fn test_hourly_buckets() {
        let movements = vec![
            movement(stockholm(2015, 4, 1, 0, 10, 0), 2),
            movement(stockholm(2015, 4, 1, 0, 50, 0), 3),
            movement(stockholm(2015, 4, 1, 1, 5, 0), 1),
        ];

        let aggregation = Aggregator::new(Granularity::Hour).aggregate(&movements);

        let buckets: Vec<(Timestamp, u64)> = aggregation.buckets.into_iter().collect();
        assert_eq!(
            buckets,
            vec![
                (stockholm(2015, 4, 1, 0, 0, 0), 5),
                (stockholm(2015, 4, 1, 1, 0, 0), 1),
            ]
        );
    }

    #[test]
    fn test_weekly_buckets_start_on_monday() {
        let movements = vec![
            movement(stockholm(2015, 4, 1, 12, 0, 0), 4),
            movement(stockholm(2015, 4, 5, 23, 0, 0), 1),
            movement(stockholm(2015, 4, 6, 0, 30, 0), 7),
        ];

        let aggregation = Aggregator::new(Granularity::Week).aggregate(&movements);

        assert_eq!(aggregation.len(), 2);
        assert_eq!(aggregation.buckets[&stockholm(2015, 3, 30, 0, 0, 0)], 5);
        assert_eq!(aggregation.buckets[&stockholm(2015, 4, 6, 0, 0, 0)], 7);
        assert_eq!(aggregation.total(), 12);
    }

    #[test]
    fn test_daily_bucket_on_day_without_midnight() {
        use chrono::TimeZone;
        use chrono_tz::America::Sao_Paulo;

        // 2015-10-18 began at 01:00 in Sao Paulo.
        let movements = vec![
            movement(Sao_Paulo.with_ymd_and_hms(2015, 10, 18, 9, 0, 0).unwrap(), 2),
            movement(Sao_Paulo.with_ymd_and_hms(2015, 10, 18, 15, 0, 0).unwrap(), 3),
        ];

        let aggregation = Aggregator::new(Granularity::Day).aggregate(&movements);

        assert_eq!(aggregation.len(), 1);
        assert_eq!(
            aggregation.buckets[&Sao_Paulo.with_ymd_and_hms(2015, 10, 18, 1, 0, 0).unwrap()],
            5
        );
    }

    #[test]
    fn test_out_of_order_input_still_yields_ascending_keys() {
        let movements = vec![
            movement(stockholm(2015, 4, 3, 8, 0, 0), 1),
            movement(stockholm(2015, 4, 1, 8, 0, 0), 1),
        ];

        let aggregation = Aggregator::new(Granularity::Day).aggregate(&movements);
        let keys: Vec<&Timestamp> = aggregation.keys().collect();

        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_empty_input() {
        let aggregation = Aggregator::new(Granularity::Day).aggregate(&[]);
        assert!(aggregation.is_empty());
        assert_eq!(aggregation.total(), 0);
        assert!((aggregation.bar_width() - 0.6).abs() < f64::EPSILON);
    }
}
