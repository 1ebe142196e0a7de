use super::period::PeriodType;
use super::sum::SumSeries;
use crate::error::{AppError, Result};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavingBucket {
    pub timestamp: String,
    pub baseline: Decimal,
    pub actual: Decimal,
    pub saving: Decimal,
}

/// Baseline against actual consumption over one bucket layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavingSeries {
    pub period_type: PeriodType,
    pub buckets: Vec<SavingBucket>,
    pub subtotal_baseline: Decimal,
    pub subtotal_actual: Decimal,
    pub subtotal_saving: Decimal,
}

impl SavingSeries {
    /// Combine two series that were aggregated over the same buckets.
    ///
    /// The saving subtotal is the difference of the two subtotals, not the sum
    /// of the per-bucket savings.
    pub fn compose(baseline: &SumSeries, actual: &SumSeries) -> Result<Self> {
        if baseline.period_type != actual.period_type {
            return Err(AppError::LayoutMismatch(format!(
                "period type {} vs {}",
                baseline.period_type, actual.period_type
            )));
        }
        if !baseline.same_layout(actual) {
            return Err(AppError::LayoutMismatch(format!(
                "{} baseline buckets vs {} actual buckets",
                baseline.buckets.len(),
                actual.buckets.len()
            )));
        }

        let buckets = baseline
            .buckets
            .iter()
            .zip(&actual.buckets)
            .map(|(b, a)| SavingBucket {
                timestamp: b.timestamp.clone(),
                baseline: b.value,
                actual: a.value,
                saving: b.value.saturating_sub(a.value),
            })
            .collect();

        Ok(Self {
            period_type: baseline.period_type,
            buckets,
            subtotal_baseline: baseline.total,
            subtotal_actual: actual.total,
            subtotal_saving: baseline.total.saturating_sub(actual.total),
        })
    }

    pub fn timestamps(&self) -> Vec<String> {
        self.buckets.iter().map(|b| b.timestamp.clone()).collect()
    }

    /// Saving subtotal converted with a unit factor (kgce, kgco2e, ...).
    pub fn subtotal_saving_in(&self, factor: Decimal) -> Decimal {
        self.subtotal_baseline
            .saturating_mul(factor)
            .saturating_sub(self.subtotal_actual.saturating_mul(factor))
    }
}

/// Relative change from `base` to `reporting`.
///
/// Unset unless both sides are set and `base` is positive.
pub fn increment_rate(reporting: Option<Decimal>, base: Option<Decimal>) -> Option<Decimal> {
    match (reporting, base) {
        (Some(reporting), Some(base)) if base > Decimal::ZERO => {
            reporting.checked_sub(base)?.checked_div(base)
        }
        _ => None,
    }
}

/// `value / area`, unset for a missing value or a non-positive area.
pub fn per_unit_area(value: Option<Decimal>, area: Option<Decimal>) -> Option<Decimal> {
    match (value, area) {
        (Some(value), Some(area)) if area > Decimal::ZERO => value.checked_div(area),
        _ => None,
    }
}
