use super::period::{buckets, Bucket, Interval, PeriodType, UtcOffset};
use super::{bucket_index, Sample};
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;

/// Descriptive statistics of a set of values.
///
/// Every field is `None` for an empty set; `stdev` and `variance` are also
/// `None` for a single value since the sample variance needs two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub sum: Option<Decimal>,
    pub mean: Option<Decimal>,
    pub median: Option<Decimal>,
    pub minimum: Option<Decimal>,
    pub maximum: Option<Decimal>,
    pub stdev: Option<Decimal>,
    pub variance: Option<Decimal>,
}

/// Statistics of `values`.
///
/// A figure whose intermediate result would overflow `Decimal` is left unset
/// instead of aborting the report.
pub fn summarize(values: &[Decimal]) -> Summary {
    if values.is_empty() {
        return Summary::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort();

    let len = sorted.len();
    let count = Decimal::from(len);
    let sum = checked_sum(sorted.iter().copied());
    let mean = sum.and_then(|sum| sum.checked_div(count));

    let mid = len / 2;
    let median = if len % 2 == 1 {
        Some(sorted[mid])
    } else {
        let (lo, hi) = (sorted[mid - 1], sorted[mid]);
        hi.checked_sub(lo)
            .and_then(|gap| lo.checked_add(gap / Decimal::TWO))
            .or_else(|| (lo / Decimal::TWO).checked_add(hi / Decimal::TWO))
    };

    let variance = match mean {
        Some(mean) if len >= 2 => checked_sum(sorted.iter().map(|v| {
            let d = v.checked_sub(mean)?;
            d.checked_mul(d)
        }))
        .and_then(|squares| squares.checked_div(count - Decimal::ONE)),
        _ => None,
    };

    Summary {
        sum,
        mean,
        median,
        minimum: sorted.first().copied(),
        maximum: sorted.last().copied(),
        stdev: variance.and_then(|v| v.sqrt()),
        variance,
    }
}

/// Sum that gives up on the first overflow or missing term.
fn checked_sum<I, T>(terms: I) -> Option<Decimal>
where
    I: IntoIterator<Item = T>,
    T: Into<Option<Decimal>>,
{
    terms
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, term| {
            let term: Option<Decimal> = term.into();
            acc.checked_add(term?)
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketStatistics {
    #[serde(skip)]
    pub bucket: Bucket,
    pub timestamp: String,
    /// Number of non-null readings in the bucket.
    pub count: usize,
    #[serde(flatten)]
    pub statistics: Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticsSeries {
    pub period_type: PeriodType,
    pub buckets: Vec<BucketStatistics>,
    /// Statistics over the sums of the buckets that received readings.
    pub summary: Summary,
}

impl StatisticsSeries {
    pub fn empty(period_type: PeriodType) -> Self {
        Self {
            period_type,
            buckets: Vec::new(),
            summary: Summary::default(),
        }
    }
}

/// Per-bucket statistics of hourly samples over `interval`.
pub fn statistics_by_period(
    samples: &[Sample],
    interval: &Interval,
    period_type: PeriodType,
    offset: UtcOffset,
) -> StatisticsSeries {
    let layout: Vec<Bucket> = buckets(interval, period_type, offset).collect();
    let mut grouped: Vec<Vec<Decimal>> = vec![Vec::new(); layout.len()];

    for sample in samples {
        let Some(value) = sample.value else {
            continue;
        };
        if let Some(idx) = bucket_index(&layout, sample.timestamp) {
            grouped[idx].push(value);
        }
    }

    let buckets: Vec<BucketStatistics> = layout
        .into_iter()
        .zip(grouped)
        .map(|(bucket, values)| BucketStatistics {
            timestamp: bucket.label.clone(),
            bucket,
            count: values.len(),
            statistics: summarize(&values),
        })
        .collect();

    let bucket_sums: Vec<Decimal> = buckets.iter().filter_map(|b| b.statistics.sum).collect();
    let summary = summarize(&bucket_sums);

    StatisticsSeries {
        period_type,
        buckets,
        summary,
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

    fn dec(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|v| Decimal::from(*v)).collect()
    }

    fn close(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() < Decimal::new(1, 6)
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), Summary::default());
    }

    #[test]
    fn test_summarize_single_value() {
        let s = summarize(&dec(&[42]));
        let v = Some(Decimal::from(42));
        assert_eq!(s.sum, v);
        assert_eq!(s.mean, v);
        assert_eq!(s.median, v);
        assert_eq!(s.minimum, v);
        assert_eq!(s.maximum, v);
        assert_eq!(s.stdev, None);
        assert_eq!(s.variance, None);
    }

    #[test]
    fn test_summarize_odd_count() {
        let s = summarize(&dec(&[6, 2, 4]));
        assert_eq!(s.sum, Some(Decimal::from(12)));
        assert_eq!(s.mean, Some(Decimal::from(4)));
        assert_eq!(s.median, Some(Decimal::from(4)));
        assert_eq!(s.minimum, Some(Decimal::from(2)));
        assert_eq!(s.maximum, Some(Decimal::from(6)));
        assert_eq!(s.variance, Some(Decimal::from(4)));
        assert!(close(s.stdev.unwrap(), Decimal::from(2)));
    }

    #[test]
    fn test_summarize_even_count_median() {
        let s = summarize(&dec(&[9, 1, 4, 3]));
        assert_eq!(s.median, Some(Decimal::new(35, 1)));
    }

    #[test]
    fn test_summarize_sample_variance() {
        let s = summarize(&dec(&[2, 4, 4, 4, 5, 5, 7, 9]));
        assert_eq!(s.mean, Some(Decimal::from(5)));
        // 32 / 7
        assert!(close(s.variance.unwrap(), Decimal::new(4571428571, 9)));
        assert!(close(s.stdev.unwrap(), Decimal::new(2138089935, 9)));
    }

    #[test]
    fn test_summarize_wide_spread_leaves_variance_unset() {
        let s = summarize(&[Decimal::ZERO, Decimal::from(1_000_000_000_000_000i64)]);
        assert_eq!(s.sum, Some(Decimal::from(1_000_000_000_000_000i64)));
        assert_eq!(s.mean, Some(Decimal::from(500_000_000_000_000i64)));
        assert_eq!(s.median, Some(Decimal::from(500_000_000_000_000i64)));
        assert_eq!(s.maximum, Some(Decimal::from(1_000_000_000_000_000i64)));
        assert_eq!(s.variance, None);
        assert_eq!(s.stdev, None);
    }

    #[test]
    fn test_summarize_sum_overflow_leaves_mean_unset() {
        let s = summarize(&[Decimal::MAX, Decimal::MAX]);
        assert_eq!(s.sum, None);
        assert_eq!(s.mean, None);
        assert_eq!(s.median, Some(Decimal::MAX));
        assert_eq!(s.minimum, Some(Decimal::MAX));
        assert_eq!(s.variance, None);
    }

    #[test]
    fn test_empty_bucket_has_unset_statistics() {
        let interval = Interval::new(utc(2024, 1, 1, 0), utc(2024, 1, 3, 0)).unwrap();
        let samples = vec![
            Sample::new(utc(2024, 1, 1, 5), Some(Decimal::from(10))),
            Sample::new(utc(2024, 1, 1, 15), Some(Decimal::from(20))),
        ];
        let series = statistics_by_period(&samples, &interval, PeriodType::Daily, UtcOffset::UTC);

        assert_eq!(series.buckets.len(), 2);
        assert_eq!(series.buckets[0].count, 2);
        assert_eq!(series.buckets[0].statistics.sum, Some(Decimal::from(30)));
        assert_eq!(series.buckets[0].statistics.median, Some(Decimal::from(15)));
        assert_eq!(series.buckets[1].timestamp, "2024-01-02");
        assert_eq!(series.buckets[1].count, 0);
        assert_eq!(series.buckets[1].statistics, Summary::default());
    }

    #[test]
    fn test_single_sample_bucket() {
        let interval = Interval::new(utc(2024, 1, 1, 0), utc(2024, 1, 2, 0)).unwrap();
        let samples = vec![
            Sample::new(utc(2024, 1, 1, 3), Some(Decimal::new(125, 1))),
            Sample::new(utc(2024, 1, 1, 4), None),
        ];
        let series = statistics_by_period(&samples, &interval, PeriodType::Daily, UtcOffset::UTC);
        let stats = &series.buckets[0].statistics;
        let v = Some(Decimal::new(125, 1));
        assert_eq!(series.buckets[0].count, 1);
        assert_eq!((stats.mean, stats.median, stats.minimum, stats.maximum), (v, v, v, v));
        assert_eq!((stats.stdev, stats.variance), (None, None));
    }

    #[test]
    fn test_summary_covers_non_empty_buckets() {
        let interval = Interval::new(utc(2024, 1, 1, 0), utc(2024, 1, 4, 0)).unwrap();
        let samples = vec![
            Sample::new(utc(2024, 1, 1, 1), Some(Decimal::from(10))),
            Sample::new(utc(2024, 1, 1, 2), Some(Decimal::from(10))),
            Sample::new(utc(2024, 1, 3, 2), Some(Decimal::from(40))),
        ];
        let series = statistics_by_period(&samples, &interval, PeriodType::Daily, UtcOffset::UTC);
        assert_eq!(series.summary.sum, Some(Decimal::from(60)));
        assert_eq!(series.summary.mean, Some(Decimal::from(30)));
        assert_eq!(series.summary.minimum, Some(Decimal::from(20)));
        assert_eq!(series.summary.maximum, Some(Decimal::from(40)));
    }

    #[test]
    fn test_bucket_statistics_serialize_flat() {
        let interval = Interval::new(utc(2024, 1, 1, 0), utc(2024, 1, 2, 0)).unwrap();
        let series = statistics_by_period(&[], &interval, PeriodType::Daily, UtcOffset::UTC);
        let json = serde_json::to_value(&series.buckets[0]).unwrap();
        assert_eq!(json["timestamp"], "2024-01-01");
        assert_eq!(json["count"], 0);
        assert!(json["mean"].is_null());
        assert!(json.get("bucket").is_none());
    }
}
