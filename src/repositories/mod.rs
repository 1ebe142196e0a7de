pub mod hourly;
pub mod meter;
pub mod point;
pub mod shopfloor;
pub mod store;
pub mod tariff;

pub use hourly::HourlyRepository;
pub use meter::MeterRepository;
pub use point::PointRepository;
pub use shopfloor::{EnergyCategoryRepository, ShopfloorRepository};
pub use store::MySqlEnergyStore;
pub use tariff::TariffRepository;

use crate::aggregation::{Interval, Sample};
use crate::error::Result;
use crate::models::{Dataset, EnergyCategory, Meter, MeterRef, Point, Shopfloor};
use crate::tariff::Tariff;
use async_trait::async_trait;

/// Everything a report reads.
///
/// Hourly series come back ordered by timestamp.
#[async_trait]
pub trait EnergyStore: Send + Sync {
    async fn find_meter(&self, meter: &MeterRef) -> Result<Option<Meter>>;

    async fn meter_hourly(
        &self,
        dataset: Dataset,
        meter_id: i64,
        interval: &Interval,
    ) -> Result<Vec<Sample>>;

    async fn find_shopfloor(&self, shopfloor_id: i64) -> Result<Option<Shopfloor>>;

    /// Energy categories with shopfloor input in any of `intervals`, ordered by id.
    async fn shopfloor_energy_categories(
        &self,
        shopfloor_id: i64,
        intervals: &[Interval],
    ) -> Result<Vec<EnergyCategory>>;

    async fn shopfloor_hourly(
        &self,
        shopfloor_id: i64,
        energy_category_id: i64,
        interval: &Interval,
    ) -> Result<Vec<Sample>>;

    async fn meter_points(&self, meter_id: i64) -> Result<Vec<Point>>;

    /// Points of the shopfloor's sensors followed by its own points.
    async fn shopfloor_points(&self, shopfloor_id: i64) -> Result<Vec<Point>>;

    /// Raw readings of `point` within `interval`, end included.
    async fn point_values(&self, point: &Point, interval: &Interval) -> Result<Vec<Sample>>;

    /// Tariffs of a cost center for one energy category overlapping `interval`.
    async fn tariffs(
        &self,
        cost_center_id: i64,
        energy_category_id: i64,
        interval: &Interval,
    ) -> Result<Vec<Tariff>>;
}
