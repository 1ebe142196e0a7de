use crate::error::{AppError, Result};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar granularity of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl PeriodType {
    pub fn as_str(self) -> &'static str {
        match self {
            PeriodType::Hourly => "hourly",
            PeriodType::Daily => "daily",
            PeriodType::Weekly => "weekly",
            PeriodType::Monthly => "monthly",
            PeriodType::Yearly => "yearly",
        }
    }

    /// strftime pattern used for bucket labels.
    pub fn label_format(self) -> &'static str {
        match self {
            PeriodType::Hourly => "%Y-%m-%dT%H:%M:%S",
            PeriodType::Daily | PeriodType::Weekly => "%Y-%m-%d",
            PeriodType::Monthly => "%Y-%m",
            PeriodType::Yearly => "%Y",
        }
    }

    /// Local start of the period containing `at`.
    ///
    /// Hourly buckets follow UTC hour boundaries (readings are stored per UTC
    /// hour); every other granularity follows the local calendar. Weekly
    /// periods are counted in whole weeks from `week_anchor`.
    fn floor(self, at: DateTime<Utc>, offset: UtcOffset, week_anchor: NaiveDate) -> NaiveDateTime {
        match self {
            PeriodType::Hourly => {
                let utc = at.naive_utc();
                let hour = utc.date().and_time(NaiveTime::MIN) + Duration::hours(i64::from(utc.hour()));
                hour + offset.as_duration()
            }
            PeriodType::Daily => start_of_day(offset.to_local(at).date()),
            PeriodType::Weekly => {
                let date = offset.to_local(at).date();
                let into_week = (date - week_anchor).num_days().rem_euclid(7);
                start_of_day(date - Duration::days(into_week))
            }
            PeriodType::Monthly => {
                let date = offset.to_local(at).date();
                start_of_day(date - Duration::days(i64::from(date.day0())))
            }
            PeriodType::Yearly => {
                let date = offset.to_local(at).date();
                start_of_day(date - Duration::days(i64::from(date.ordinal0())))
            }
        }
    }

    /// Local start of the period following the one starting at `aligned`.
    fn advance(self, aligned: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            PeriodType::Hourly => aligned.checked_add_signed(Duration::hours(1)),
            PeriodType::Daily => aligned.checked_add_signed(Duration::days(1)),
            PeriodType::Weekly => aligned.checked_add_signed(Duration::weeks(1)),
            PeriodType::Monthly => aligned.checked_add_months(Months::new(1)),
            PeriodType::Yearly => aligned.checked_add_months(Months::new(12)),
        }
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

impl FromStr for PeriodType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "hourly" => Ok(PeriodType::Hourly),
            "daily" => Ok(PeriodType::Daily),
            "weekly" => Ok(PeriodType::Weekly),
            "monthly" => Ok(PeriodType::Monthly),
            "yearly" => Ok(PeriodType::Yearly),
            other => Err(AppError::InvalidPeriodType(other.to_string())),
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed offset of the display timezone, in minutes east of UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UtcOffset(i32);

impl UtcOffset {
    pub const UTC: UtcOffset = UtcOffset(0);

    pub fn from_minutes(minutes: i32) -> Result<Self> {
        if minutes.abs() > 14 * 60 {
            return Err(AppError::InvalidUtcOffset(format!("{} minutes", minutes)));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(self) -> i32 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }

    pub fn to_local(self, utc: DateTime<Utc>) -> NaiveDateTime {
        utc.naive_utc() + self.as_duration()
    }

    pub fn to_utc(self, local: NaiveDateTime) -> DateTime<Utc> {
        Utc.from_utc_datetime(&(local - self.as_duration()))
    }

    /// Parse a request datetime given in local time (`YYYY-MM-DDTHH:MM:SS`).
    pub fn parse_local(self, value: &str) -> Result<DateTime<Utc>> {
        let local = NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%dT%H:%M:%S")
            .map_err(|e| AppError::Validation(format!("invalid local datetime '{}': {}", value, e)))?;
        Ok(self.to_utc(local))
    }
}

impl FromStr for UtcOffset {
    type Err = AppError;

    /// Accepts `+HH:MM` / `-HH:MM`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AppError::InvalidUtcOffset(s.to_string());
        let s = s.trim();
        let (sign, rest) = match s.chars().next() {
            Some('+') => (1, &s[1..]),
            Some('-') => (-1, &s[1..]),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
        let two_digits = |field: &str| field.len() == 2 && field.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(hours) || !two_digits(minutes) {
            return Err(invalid());
        }
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if minutes >= 60 {
            return Err(invalid());
        }
        UtcOffset::from_minutes(sign * (hours * 60 + minutes))
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { '-' } else { '+' };
        let abs = self.0.abs();
        write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)
    }
}

/// Half-open UTC interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(AppError::InvalidInterval {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }
}

/// One aggregation unit of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
}

impl Bucket {
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }
}

/// Lazily walks the buckets of an interval in ascending order.
#[derive(Debug, Clone)]
pub struct Buckets {
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    period: PeriodType,
    offset: UtcOffset,
    week_anchor: NaiveDate,
}

impl Iterator for Buckets {
    type Item = Bucket;

    fn next(&mut self) -> Option<Bucket> {
        if self.cursor >= self.end {
            return None;
        }
        let aligned = self.period.floor(self.cursor, self.offset, self.week_anchor);
        let bucket_end = self
            .period
            .advance(aligned)
            .map(|next| self.offset.to_utc(next))
            .filter(|next| *next < self.end)
            .unwrap_or(self.end);

        let bucket = Bucket {
            start: self.cursor,
            end: bucket_end,
            label: aligned.format(self.period.label_format()).to_string(),
        };
        self.cursor = bucket_end;
        Some(bucket)
    }
}

impl std::iter::FusedIterator for Buckets {}

/// Calendar-aligned buckets covering `interval` exactly.
///
/// A first period that began before `interval.start()` is clipped to it and the
/// last one is truncated at `interval.end()`.
pub fn buckets(interval: &Interval, period: PeriodType, offset: UtcOffset) -> Buckets {
    Buckets {
        cursor: interval.start,
        end: interval.end,
        period,
        offset,
        week_anchor: offset.to_local(interval.start).date(),
    }
}
