//! Axis labels for bucket keys.

use birdcount_common::{Granularity, Timestamp};

/// Maps bucket starts to tick labels, one label per key.
#[derive(Debug, Clone, Copy)]
pub struct LabelGenerator {
    granularity: Granularity,
}

impl LabelGenerator {
    /// Creates a generator for the given bucket width.
    pub const fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    /// Labels for `keys`, in the same order.
    pub fn labels<'a, I>(&self, keys: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a Timestamp>,
    {
        keys.into_iter()
            .map(|key| self.granularity.label(key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use birdcount_common::test_utils::stockholm;

    #[test]
    fn test_hourly_labels_are_sparse() {
        let keys: Vec<Timestamp> = (0..4).map(|h| stockholm(2015, 4, 2, h, 0, 0)).collect();
        let labels = LabelGenerator::new(Granularity::Hour).labels(&keys);
        assert_eq!(labels, vec!["00:00", "2015-04-02", "02:00", ""]);
    }

    #[test]
    fn test_daily_and_weekly_labels() {
        let monday = stockholm(2015, 3, 30, 0, 0, 0);
        assert_eq!(
            LabelGenerator::new(Granularity::Day).labels([&monday]),
            vec!["2015-03-30"]
        );
        assert_eq!(
            LabelGenerator::new(Granularity::Week).labels([&monday]),
            vec!["week number 13"]
        );
    }

    #[test]
    fn test_no_keys_no_labels() {
        assert!(LabelGenerator::new(Granularity::Hour)
            .labels(&Vec::<Timestamp>::new())
            .is_empty());
    }
}
