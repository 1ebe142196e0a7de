use super::request::{ShopfloorStatisticsParams, ShopfloorStatisticsRequest};
use crate::aggregation::{
    aggregate_by_period, increment_rate, per_unit_area, statistics_by_period, Interval, PeriodType,
    UtcOffset,
};
use crate::error::{AppError, Result};
use crate::models::{
    CategoryStatistics, EnergyCategory, ParameterSeries, ReportingCategoryStatistics,
    ShopfloorInfo, ShopfloorStatisticsReport, StatisticValues,
};
use crate::repositories::EnergyStore;
use crate::tariff::hourly_tariffs;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// Per energy category consumption statistics of one shopfloor.
#[derive(Clone)]
pub struct ShopfloorStatisticsService {
    store: Arc<dyn EnergyStore>,
    offset: UtcOffset,
}

impl ShopfloorStatisticsService {
    pub fn new(store: Arc<dyn EnergyStore>, offset: UtcOffset) -> Self {
        Self { store, offset }
    }

    pub async fn report(
        &self,
        params: &ShopfloorStatisticsParams,
    ) -> Result<ShopfloorStatisticsReport> {
        let request = ShopfloorStatisticsRequest::from_params(params, self.offset)?;
        self.build(&request).await
    }

    pub async fn build(
        &self,
        request: &ShopfloorStatisticsRequest,
    ) -> Result<ShopfloorStatisticsReport> {
        let window = &request.window;
        let shopfloor = self
            .store
            .find_shopfloor(request.shopfloor_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("shopfloor {}", request.shopfloor_id)))?;

        let categories = self
            .store
            .shopfloor_energy_categories(shopfloor.id, &window.intervals())
            .await?;

        let mut base_period = Vec::with_capacity(categories.len());
        let mut reporting_period = Vec::with_capacity(categories.len());
        let mut parameters = Vec::new();

        for category in &categories {
            let base = match &window.base {
                Some(interval) => {
                    self.category_statistics(shopfloor.id, category, interval, window.period_type)
                        .await?
                }
                None => CategoryStatistics {
                    energy_category_id: category.id,
                    name: category.name.clone(),
                    unit_of_measure: category.unit_of_measure.clone(),
                    timestamps: Vec::new(),
                    values: Vec::new(),
                    subtotal: Decimal::ZERO,
                    statistics: StatisticValues::default(),
                },
            };
            let reporting = self
                .category_statistics(shopfloor.id, category, &window.reporting, window.period_type)
                .await?;

            let per_area = reporting
                .statistics
                .map(|value| per_unit_area(value, shopfloor.area));
            let increment = reporting
                .statistics
                .combine(&base.statistics, increment_rate);

            if !window.quick_mode {
                let tariffs = self
                    .store
                    .tariffs(shopfloor.cost_center_id, category.id, &window.reporting)
                    .await?;
                let prices = hourly_tariffs(&tariffs, &window.reporting, self.offset);
                parameters.push(ParameterSeries::tariff(&category.name, &prices, self.offset));
            }

            base_period.push(base);
            reporting_period.push(ReportingCategoryStatistics {
                category: reporting,
                per_unit_area: per_area,
                increment_rate: increment,
            });
        }

        if !window.quick_mode {
            for point in self.store.shopfloor_points(shopfloor.id).await? {
                let values = self.store.point_values(&point, &window.reporting).await?;
                parameters.push(ParameterSeries::point(&point, &values, self.offset));
            }
        }

        info!(
            shopfloor_id = shopfloor.id,
            period_type = %window.period_type,
            categories = categories.len(),
            parameters = parameters.len(),
            "Built shopfloor statistics report"
        );

        Ok(ShopfloorStatisticsReport {
            shopfloor: ShopfloorInfo {
                id: shopfloor.id,
                name: shopfloor.name,
                area: shopfloor.area,
            },
            period_type: window.period_type,
            base_period,
            reporting_period,
            parameters,
        })
    }

    async fn category_statistics(
        &self,
        shopfloor_id: i64,
        category: &EnergyCategory,
        interval: &Interval,
        period_type: PeriodType,
    ) -> Result<CategoryStatistics> {
        let samples = self
            .store
            .shopfloor_hourly(shopfloor_id, category.id, interval)
            .await?;
        let sums = aggregate_by_period(&samples, interval, period_type, self.offset);
        let stats = statistics_by_period(&samples, interval, period_type, self.offset);

        Ok(CategoryStatistics {
            energy_category_id: category.id,
            name: category.name.clone(),
            unit_of_measure: category.unit_of_measure.clone(),
            timestamps: sums.timestamps(),
            values: sums.values(),
            subtotal: sums.total,
            statistics: StatisticValues::from(&stats.summary),
        })
    }
}
