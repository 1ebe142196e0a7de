//! Time-of-use tariff lookup.
//!
//! Tariffs are attached to a cost center per energy category. A time-of-use
//! tariff prices each hour by the local time of day the hour starts at.

use crate::aggregation::{Interval, UtcOffset};
use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TariffType {
    TimeOfUse,
    Block,
}

impl FromStr for TariffType {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "timeofuse" => Ok(TariffType::TimeOfUse),
            "block" => Ok(TariffType::Block),
            other => Err(crate::error::AppError::Validation(format!(
                "unknown tariff type '{}'",
                other
            ))),
        }
    }
}

/// Price for the hours whose local start lies in `[start, end]`.
///
/// `start > end` describes a block that wraps past midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOfUseBlock {
    pub start_time_of_day: NaiveTime,
    pub end_time_of_day: NaiveTime,
    pub price: Decimal,
}

impl TimeOfUseBlock {
    pub fn covers(&self, time_of_day: NaiveTime) -> bool {
        if self.start_time_of_day <= self.end_time_of_day {
            self.start_time_of_day <= time_of_day && time_of_day <= self.end_time_of_day
        } else {
            time_of_day >= self.start_time_of_day || time_of_day <= self.end_time_of_day
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tariff {
    pub id: i64,
    pub name: String,
    pub tariff_type: TariffType,
    pub valid_from: DateTime<Utc>,
    pub valid_through: DateTime<Utc>,
    pub blocks: Vec<TimeOfUseBlock>,
}

impl Tariff {
    fn is_valid_at(&self, ts: DateTime<Utc>) -> bool {
        self.valid_from <= ts && ts <= self.valid_through
    }

    fn price_at(&self, ts: DateTime<Utc>, offset: UtcOffset) -> Option<Decimal> {
        if self.tariff_type != TariffType::TimeOfUse || !self.is_valid_at(ts) {
            return None;
        }
        let time_of_day = offset.to_local(ts).time();
        self.blocks
            .iter()
            .find(|block| block.covers(time_of_day))
            .map(|block| block.price)
    }
}

fn hour_floor(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts - Duration::minutes(i64::from(ts.minute()))
        - Duration::seconds(i64::from(ts.second()))
        - Duration::nanoseconds(i64::from(ts.nanosecond()))
}

/// Price of every UTC hour in `interval` covered by one of `tariffs`.
///
/// When tariffs overlap, the first one in the slice wins.
pub fn hourly_tariffs(
    tariffs: &[Tariff],
    interval: &Interval,
    offset: UtcOffset,
) -> BTreeMap<DateTime<Utc>, Decimal> {
    let mut prices = BTreeMap::new();
    let mut hour = hour_floor(interval.start());

    while hour < interval.end() {
        if let Some(price) = tariffs.iter().find_map(|t| t.price_at(hour, offset)) {
            prices.insert(hour, price);
        }
        hour += Duration::hours(1);
    }

    debug!(
        tariffs = tariffs.len(),
        priced_hours = prices.len(),
        "Expanded tariffs to hourly prices"
    );
    prices
}
