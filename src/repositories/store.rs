use super::{
    EnergyCategoryRepository, EnergyStore, HourlyRepository, MeterRepository, PointRepository,
    ShopfloorRepository, TariffRepository,
};
use crate::aggregation::{Interval, Sample};
use crate::db::Databases;
use crate::error::Result;
use crate::models::{Dataset, EnergyCategory, Meter, MeterRef, Point, Shopfloor};
use crate::tariff::Tariff;
use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::debug;

/// [`EnergyStore`] over the MySQL system, energy and baseline databases.
#[derive(Debug, Clone)]
pub struct MySqlEnergyStore {
    dbs: Databases,
}

impl MySqlEnergyStore {
    pub fn new(dbs: Databases) -> Self {
        Self { dbs }
    }
}

#[async_trait]
impl EnergyStore for MySqlEnergyStore {
    async fn find_meter(&self, meter: &MeterRef) -> Result<Option<Meter>> {
        MeterRepository::find(&self.dbs.system, meter).await
    }

    async fn meter_hourly(
        &self,
        dataset: Dataset,
        meter_id: i64,
        interval: &Interval,
    ) -> Result<Vec<Sample>> {
        let pool = match dataset {
            Dataset::Actual => &self.dbs.energy,
            Dataset::Baseline => &self.dbs.energy_baseline,
        };
        let samples = HourlyRepository::meter_hourly(pool, meter_id, interval).await?;
        debug!(meter_id, ?dataset, rows = samples.len(), "Loaded meter hourly rows");
        Ok(samples)
    }

    async fn find_shopfloor(&self, shopfloor_id: i64) -> Result<Option<Shopfloor>> {
        ShopfloorRepository::find_by_id(&self.dbs.system, shopfloor_id).await
    }

    async fn shopfloor_energy_categories(
        &self,
        shopfloor_id: i64,
        intervals: &[Interval],
    ) -> Result<Vec<EnergyCategory>> {
        let mut ids = BTreeSet::new();
        for interval in intervals {
            ids.extend(
                HourlyRepository::shopfloor_category_ids(&self.dbs.energy, shopfloor_id, interval)
                    .await?,
            );
        }
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let categories = EnergyCategoryRepository::list_all(&self.dbs.system).await?;
        Ok(categories
            .into_iter()
            .filter(|c| ids.contains(&c.id))
            .collect())
    }

    async fn shopfloor_hourly(
        &self,
        shopfloor_id: i64,
        energy_category_id: i64,
        interval: &Interval,
    ) -> Result<Vec<Sample>> {
        HourlyRepository::shopfloor_hourly(&self.dbs.energy, shopfloor_id, energy_category_id, interval)
            .await
    }

    async fn meter_points(&self, meter_id: i64) -> Result<Vec<Point>> {
        PointRepository::for_meter(&self.dbs.system, meter_id).await
    }

    async fn shopfloor_points(&self, shopfloor_id: i64) -> Result<Vec<Point>> {
        PointRepository::for_shopfloor(&self.dbs.system, shopfloor_id).await
    }

    async fn point_values(&self, point: &Point, interval: &Interval) -> Result<Vec<Sample>> {
        let samples = PointRepository::values(&self.dbs.historical, point, interval).await?;
        debug!(point_id = point.id, rows = samples.len(), "Loaded point values");
        Ok(samples)
    }

    async fn tariffs(
        &self,
        cost_center_id: i64,
        energy_category_id: i64,
        interval: &Interval,
    ) -> Result<Vec<Tariff>> {
        TariffRepository::find_for_cost_center(
            &self.dbs.system,
            cost_center_id,
            energy_category_id,
            interval,
        )
        .await
    }
}
