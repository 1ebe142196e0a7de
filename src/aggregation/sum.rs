use super::period::{buckets, Bucket, Interval, PeriodType, UtcOffset};
use super::{bucket_index, Sample};
use rust_decimal::Decimal;
use serde::Serialize;

/// Total of one bucket. Buckets without readings carry zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSum {
    #[serde(skip)]
    pub bucket: Bucket,
    pub timestamp: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SumSeries {
    pub period_type: PeriodType,
    pub buckets: Vec<BucketSum>,
    pub total: Decimal,
}

impl SumSeries {
    /// Series with no buckets, used when a report period was not requested.
    pub fn empty(period_type: PeriodType) -> Self {
        Self {
            period_type,
            buckets: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    pub fn timestamps(&self) -> Vec<String> {
        self.buckets.iter().map(|b| b.timestamp.clone()).collect()
    }

    pub fn values(&self) -> Vec<Decimal> {
        self.buckets.iter().map(|b| b.value).collect()
    }

    /// True when both series share the same bucket boundaries.
    pub fn same_layout(&self, other: &SumSeries) -> bool {
        self.buckets.len() == other.buckets.len()
            && self
                .buckets
                .iter()
                .zip(&other.buckets)
                .all(|(a, b)| a.bucket.start == b.bucket.start && a.bucket.end == b.bucket.end)
    }
}

/// Sum hourly samples into calendar buckets over `interval`.
///
/// Samples outside the interval and samples without a value are ignored.
/// Sums saturate at the `Decimal` range.
pub fn aggregate_by_period(
    samples: &[Sample],
    interval: &Interval,
    period_type: PeriodType,
    offset: UtcOffset,
) -> SumSeries {
    let layout: Vec<Bucket> = buckets(interval, period_type, offset).collect();
    let mut sums = vec![Decimal::ZERO; layout.len()];

    for sample in samples {
        let Some(value) = sample.value else {
            continue;
        };
        if let Some(idx) = bucket_index(&layout, sample.timestamp) {
            sums[idx] = sums[idx].saturating_add(value);
        }
    }

    let buckets: Vec<BucketSum> = layout
        .into_iter()
        .zip(sums)
        .map(|(bucket, value)| BucketSum {
            timestamp: bucket.label.clone(),
            bucket,
            value,
        })
        .collect();
    let total = buckets
        .iter()
        .fold(Decimal::ZERO, |acc, b| acc.saturating_add(b.value));

    SumSeries {
        period_type,
        buckets,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn sample(ts: DateTime<Utc>, value: i64) -> Sample {
        Sample::new(ts, Some(Decimal::from(value)))
    }

    fn two_days() -> Interval {
        Interval::new(utc(2024, 1, 1, 0), utc(2024, 1, 3, 0)).unwrap()
    }

    #[test]
    fn test_daily_sums() {
        let samples = vec![
            sample(utc(2024, 1, 1, 5), 10),
            sample(utc(2024, 1, 1, 15), 20),
            sample(utc(2024, 1, 2, 10), 5),
        ];
        let series = aggregate_by_period(&samples, &two_days(), PeriodType::Daily, UtcOffset::UTC);

        let rows: Vec<(String, Decimal)> = series
            .buckets
            .iter()
            .map(|b| (b.timestamp.clone(), b.value))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("2024-01-01".to_string(), Decimal::from(30)),
                ("2024-01-02".to_string(), Decimal::from(5)),
            ]
        );
        assert_eq!(series.total, Decimal::from(35));
    }

    #[test]
    fn test_empty_bucket_is_zero_filled() {
        let samples = vec![sample(utc(2024, 1, 1, 5), 10), sample(utc(2024, 1, 1, 15), 20)];
        let series = aggregate_by_period(&samples, &two_days(), PeriodType::Daily, UtcOffset::UTC);
        assert_eq!(series.buckets.len(), 2);
        assert_eq!(series.buckets[1].value, Decimal::ZERO);
        assert_eq!(series.total, Decimal::from(30));
    }

    #[test]
    fn test_null_values_and_out_of_range_samples_are_skipped() {
        let samples = vec![
            Sample::new(utc(2024, 1, 1, 1), None),
            sample(utc(2023, 12, 31, 23), 100),
            sample(utc(2024, 1, 3, 0), 100),
            sample(utc(2024, 1, 2, 1), 7),
        ];
        let series = aggregate_by_period(&samples, &two_days(), PeriodType::Daily, UtcOffset::UTC);
        assert_eq!(series.values(), vec![Decimal::ZERO, Decimal::from(7)]);
    }

    #[test]
    fn test_unsorted_samples_give_ascending_buckets() {
        let samples = vec![
            sample(utc(2024, 1, 2, 10), 5),
            sample(utc(2024, 1, 1, 15), 20),
            sample(utc(2024, 1, 1, 5), 10),
        ];
        let series = aggregate_by_period(&samples, &two_days(), PeriodType::Daily, UtcOffset::UTC);
        assert_eq!(series.timestamps(), vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(series.values(), vec![Decimal::from(30), Decimal::from(5)]);
    }

    #[test]
    fn test_total_matches_independent_sum() {
        let interval = Interval::new(utc(2024, 1, 1, 0), utc(2024, 3, 1, 0)).unwrap();
        let samples: Vec<Sample> = (0..24 * 59)
            .map(|h| {
                Sample::new(
                    utc(2024, 1, 1, 0) + chrono::Duration::hours(h),
                    Some(Decimal::new(h * 7 + 13, 2)),
                )
            })
            .collect();
        let expected: Decimal = samples.iter().filter_map(|s| s.value).sum();

        for period in [
            PeriodType::Hourly,
            PeriodType::Daily,
            PeriodType::Weekly,
            PeriodType::Monthly,
            PeriodType::Yearly,
        ] {
            let series = aggregate_by_period(&samples, &interval, period, UtcOffset::UTC);
            let bucket_sum: Decimal = series.values().into_iter().sum();
            assert_eq!(bucket_sum, expected, "{}", period);
            assert_eq!(series.total, expected, "{}", period);
        }
    }

    #[test]
    fn test_same_layout() {
        let a = aggregate_by_period(&[], &two_days(), PeriodType::Daily, UtcOffset::UTC);
        let b = aggregate_by_period(&[], &two_days(), PeriodType::Daily, UtcOffset::UTC);
        let c = aggregate_by_period(&[], &two_days(), PeriodType::Hourly, UtcOffset::UTC);
        assert!(a.same_layout(&b));
        assert!(!a.same_layout(&c));
        assert!(SumSeries::empty(PeriodType::Daily).same_layout(&SumSeries::empty(PeriodType::Daily)));
    }

    #[test]
    fn test_sums_saturate_instead_of_overflowing() {
        let interval = Interval::new(utc(2024, 1, 1, 0), utc(2024, 1, 3, 0)).unwrap();
        let samples = vec![
            Sample::new(utc(2024, 1, 1, 1), Some(Decimal::MAX)),
            Sample::new(utc(2024, 1, 1, 2), Some(Decimal::MAX)),
            Sample::new(utc(2024, 1, 2, 1), Some(Decimal::ONE)),
        ];
        let series = aggregate_by_period(&samples, &interval, PeriodType::Daily, UtcOffset::UTC);
        assert_eq!(series.values(), vec![Decimal::MAX, Decimal::ONE]);
        assert_eq!(series.total, Decimal::MAX);
    }
}
