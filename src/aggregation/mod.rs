//! Periodic aggregation of hourly readings.
//!
//! Readings come in as [`Sample`]s, get grouped into calendar [`Bucket`]s by
//! [`period::buckets`] and are reduced either to zero-filled sums
//! ([`sum::aggregate_by_period`]) or to per-bucket descriptive statistics
//! ([`statistics::statistics_by_period`]).

pub mod period;
pub mod saving;
pub mod statistics;
pub mod sum;

pub use period::{buckets, Bucket, Interval, PeriodType, UtcOffset};
pub use saving::{increment_rate, per_unit_area, SavingSeries};
pub use statistics::{statistics_by_period, summarize, BucketStatistics, StatisticsSeries, Summary};
pub use sum::{aggregate_by_period, BucketSum, SumSeries};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// One hourly reading. `value` is `None` when nothing was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: Option<Decimal>,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, value: Option<Decimal>) -> Self {
        Self { timestamp, value }
    }
}

impl From<(DateTime<Utc>, Option<Decimal>)> for Sample {
    fn from((timestamp, value): (DateTime<Utc>, Option<Decimal>)) -> Self {
        Self { timestamp, value }
    }
}

/// Index of the bucket containing `ts` in an ascending, contiguous layout.
pub(crate) fn bucket_index(layout: &[Bucket], ts: DateTime<Utc>) -> Option<usize> {
    let idx = layout.partition_point(|b| b.end <= ts);
    layout.get(idx).filter(|b| b.contains(ts)).map(|_| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bucket_index() {
        let interval = Interval::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap(),
        )
        .unwrap();
        let layout: Vec<Bucket> = buckets(&interval, PeriodType::Daily, UtcOffset::UTC).collect();

        let at = |d, h| Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap();
        assert_eq!(bucket_index(&layout, at(1, 0)), Some(0));
        assert_eq!(bucket_index(&layout, at(1, 23)), Some(0));
        assert_eq!(bucket_index(&layout, at(2, 0)), Some(1));
        assert_eq!(bucket_index(&layout, at(3, 23)), Some(2));
        assert_eq!(bucket_index(&layout, at(4, 0)), None);
        assert_eq!(
            bucket_index(&layout, Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap()),
            None
        );
    }
}
