use super::request::{MeterSavingParams, MeterSavingRequest};
use crate::aggregation::{
    aggregate_by_period, increment_rate, Interval, PeriodType, SavingSeries, SumSeries, UtcOffset,
};
use crate::error::{AppError, Result};
use crate::models::{
    Dataset, Meter, MeterInfo, MeterSavingReport, ParameterSeries, ReportingSavingPeriod,
    SavingPeriod,
};
use crate::repositories::EnergyStore;
use crate::tariff::hourly_tariffs;
use std::sync::Arc;
use tracing::{debug, info};

/// Baseline against actual consumption of one meter.
#[derive(Clone)]
pub struct MeterSavingService {
    store: Arc<dyn EnergyStore>,
    offset: UtcOffset,
}

impl MeterSavingService {
    pub fn new(store: Arc<dyn EnergyStore>, offset: UtcOffset) -> Self {
        Self { store, offset }
    }

    pub async fn report(&self, params: &MeterSavingParams) -> Result<MeterSavingReport> {
        let request = MeterSavingRequest::from_params(params, self.offset)?;
        self.build(&request).await
    }

    pub async fn build(&self, request: &MeterSavingRequest) -> Result<MeterSavingReport> {
        let window = &request.window;
        let meter = self
            .store
            .find_meter(&request.meter)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("meter {}", request.meter)))?;

        let base = match &window.base {
            Some(interval) => self.saving_series(&meter, interval, window.period_type).await?,
            None => SavingSeries::compose(
                &SumSeries::empty(window.period_type),
                &SumSeries::empty(window.period_type),
            )?,
        };
        let reporting = self
            .saving_series(&meter, &window.reporting, window.period_type)
            .await?;

        let category = &meter.energy_category;
        let base_period = SavingPeriod::new(&base, category);
        let period = SavingPeriod::new(&reporting, category);
        let reporting_period = ReportingSavingPeriod {
            increment_rate_saving: increment_rate(
                Some(period.subtotal_saving),
                Some(base_period.subtotal_saving),
            ),
            increment_rate_in_kgce_saving: increment_rate(
                Some(period.subtotal_in_kgce_saving),
                Some(base_period.subtotal_in_kgce_saving),
            ),
            increment_rate_in_kgco2e_saving: increment_rate(
                Some(period.subtotal_in_kgco2e_saving),
                Some(base_period.subtotal_in_kgco2e_saving),
            ),
            period,
        };

        let parameters = if window.quick_mode {
            Vec::new()
        } else {
            let tariffs = self
                .store
                .tariffs(meter.cost_center_id, category.id, &window.reporting)
                .await?;
            let prices = hourly_tariffs(&tariffs, &window.reporting, self.offset);
            let mut parameters = vec![ParameterSeries::tariff(&meter.name, &prices, self.offset)];
            for point in self.store.meter_points(meter.id).await? {
                let values = self.store.point_values(&point, &window.reporting).await?;
                parameters.push(ParameterSeries::point(&point, &values, self.offset));
            }
            parameters
        };

        info!(
            meter_id = meter.id,
            period_type = %window.period_type,
            buckets = reporting_period.period.timestamps.len(),
            subtotal_saving = %reporting_period.period.subtotal_saving,
            "Built meter saving report"
        );

        Ok(MeterSavingReport {
            meter: MeterInfo {
                id: meter.id,
                name: meter.name.clone(),
                energy_category_id: category.id,
                energy_category_name: category.name.clone(),
                unit_of_measure: category.unit_of_measure.clone(),
            },
            period_type: window.period_type,
            base_period,
            reporting_period,
            parameters,
        })
    }

    async fn saving_series(
        &self,
        meter: &Meter,
        interval: &Interval,
        period_type: PeriodType,
    ) -> Result<SavingSeries> {
        let baseline = self
            .store
            .meter_hourly(Dataset::Baseline, meter.id, interval)
            .await?;
        let actual = self
            .store
            .meter_hourly(Dataset::Actual, meter.id, interval)
            .await?;
        debug!(
            meter_id = meter.id,
            baseline = baseline.len(),
            actual = actual.len(),
            "Aggregating meter samples"
        );

        let baseline = aggregate_by_period(&baseline, interval, period_type, self.offset);
        let actual = aggregate_by_period(&actual, interval, period_type, self.offset);
        SavingSeries::compose(&baseline, &actual)
    }
}
