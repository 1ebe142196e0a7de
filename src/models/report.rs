use crate::aggregation::{PeriodType, Sample, SavingSeries, Summary, UtcOffset};
use crate::models::{EnergyCategory, Point};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// A named time series shown next to a report, e.g. the tariff in force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSeries {
    pub name: String,
    pub timestamps: Vec<String>,
    pub values: Vec<Decimal>,
}

impl ParameterSeries {
    /// Tariff timeline labelled in local time.
    pub fn tariff(
        subject: &str,
        prices: &BTreeMap<DateTime<Utc>, Decimal>,
        offset: UtcOffset,
    ) -> Self {
        let (timestamps, values): (Vec<String>, Vec<Decimal>) = prices
            .iter()
            .map(|(ts, price)| {
                let local = offset.to_local(*ts);
                (local.format("%Y-%m-%dT%H:%M:%S").to_string(), *price)
            })
            .unzip();
        Self {
            name: format!("TARIFF-{}", subject),
            timestamps,
            values,
        }
    }
}

impl ParameterSeries {
    /// Raw readings of a point, named `<name> (<units>)`. Readings without a
    /// value are dropped.
    pub fn point(point: &Point, samples: &[Sample], offset: UtcOffset) -> Self {
        let (timestamps, values): (Vec<String>, Vec<Decimal>) = samples
            .iter()
            .filter_map(|s| {
                let value = s.value?;
                let local = offset.to_local(s.timestamp);
                Some((local.format("%Y-%m-%dT%H:%M:%S").to_string(), value))
            })
            .unzip();
        Self {
            name: format!("{} ({})", point.name, point.units),
            timestamps,
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeterInfo {
    pub id: i64,
    pub name: String,
    pub energy_category_id: i64,
    pub energy_category_name: String,
    pub unit_of_measure: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavingPeriod {
    pub timestamps: Vec<String>,
    pub values_baseline: Vec<Decimal>,
    pub values_actual: Vec<Decimal>,
    pub values_saving: Vec<Decimal>,
    pub subtotal_baseline: Decimal,
    pub subtotal_actual: Decimal,
    pub subtotal_saving: Decimal,
    pub subtotal_in_kgce_saving: Decimal,
    pub subtotal_in_kgco2e_saving: Decimal,
}

impl SavingPeriod {
    pub fn new(series: &SavingSeries, category: &EnergyCategory) -> Self {
        Self {
            timestamps: series.timestamps(),
            values_baseline: series.buckets.iter().map(|b| b.baseline).collect(),
            values_actual: series.buckets.iter().map(|b| b.actual).collect(),
            values_saving: series.buckets.iter().map(|b| b.saving).collect(),
            subtotal_baseline: series.subtotal_baseline,
            subtotal_actual: series.subtotal_actual,
            subtotal_saving: series.subtotal_saving,
            subtotal_in_kgce_saving: series.subtotal_saving_in(category.kgce),
            subtotal_in_kgco2e_saving: series.subtotal_saving_in(category.kgco2e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportingSavingPeriod {
    #[serde(flatten)]
    pub period: SavingPeriod,
    pub increment_rate_saving: Option<Decimal>,
    pub increment_rate_in_kgce_saving: Option<Decimal>,
    pub increment_rate_in_kgco2e_saving: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeterSavingReport {
    pub meter: MeterInfo,
    pub period_type: PeriodType,
    pub base_period: SavingPeriod,
    pub reporting_period: ReportingSavingPeriod,
    pub parameters: Vec<ParameterSeries>,
}

/// The descriptive statistics shown per energy category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatisticValues {
    pub mean: Option<Decimal>,
    pub median: Option<Decimal>,
    pub minimum: Option<Decimal>,
    pub maximum: Option<Decimal>,
    pub stdev: Option<Decimal>,
    pub variance: Option<Decimal>,
}

impl StatisticValues {
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(Option<Decimal>) -> Option<Decimal>,
    {
        Self {
            mean: f(self.mean),
            median: f(self.median),
            minimum: f(self.minimum),
            maximum: f(self.maximum),
            stdev: f(self.stdev),
            variance: f(self.variance),
        }
    }

    pub fn combine<F>(&self, other: &Self, f: F) -> Self
    where
        F: Fn(Option<Decimal>, Option<Decimal>) -> Option<Decimal>,
    {
        Self {
            mean: f(self.mean, other.mean),
            median: f(self.median, other.median),
            minimum: f(self.minimum, other.minimum),
            maximum: f(self.maximum, other.maximum),
            stdev: f(self.stdev, other.stdev),
            variance: f(self.variance, other.variance),
        }
    }
}

impl From<&Summary> for StatisticValues {
    fn from(summary: &Summary) -> Self {
        Self {
            mean: summary.mean,
            median: summary.median,
            minimum: summary.minimum,
            maximum: summary.maximum,
            stdev: summary.stdev,
            variance: summary.variance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStatistics {
    pub energy_category_id: i64,
    pub name: String,
    pub unit_of_measure: String,
    pub timestamps: Vec<String>,
    pub values: Vec<Decimal>,
    pub subtotal: Decimal,
    #[serde(flatten)]
    pub statistics: StatisticValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportingCategoryStatistics {
    #[serde(flatten)]
    pub category: CategoryStatistics,
    pub per_unit_area: StatisticValues,
    pub increment_rate: StatisticValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopfloorInfo {
    pub id: i64,
    pub name: String,
    pub area: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopfloorStatisticsReport {
    pub shopfloor: ShopfloorInfo,
    pub period_type: PeriodType,
    pub base_period: Vec<CategoryStatistics>,
    pub reporting_period: Vec<ReportingCategoryStatistics>,
    pub parameters: Vec<ParameterSeries>,
}
