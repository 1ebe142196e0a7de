use crate::aggregation::Interval;
use crate::db::DbPool;
use crate::error::AppError;
use crate::tariff::{Tariff, TariffType, TimeOfUseBlock};
use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use sqlx::{mysql::MySqlRow, FromRow, Row};
use tracing::warn;

#[derive(Debug, Clone)]
struct TariffRow {
    id: i64,
    name: String,
    tariff_type: String,
    valid_from_datetime_utc: NaiveDateTime,
    valid_through_datetime_utc: NaiveDateTime,
}

impl<'r> FromRow<'r, MySqlRow> for TariffRow {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            tariff_type: row.try_get("tariff_type")?,
            valid_from_datetime_utc: row.try_get("valid_from_datetime_utc")?,
            valid_through_datetime_utc: row.try_get("valid_through_datetime_utc")?,
        })
    }
}

impl<'r> FromRow<'r, MySqlRow> for TimeOfUseBlock {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        let start_time_of_day: NaiveTime = row.try_get("start_time_of_day")?;
        let end_time_of_day: NaiveTime = row.try_get("end_time_of_day")?;
        let price: Decimal = row.try_get("price")?;
        Ok(Self {
            start_time_of_day,
            end_time_of_day,
            price,
        })
    }
}

pub struct TariffRepository;

impl TariffRepository {
    /// Tariffs of a cost center for one energy category that are valid at
    /// some point of `interval`, oldest first.
    pub async fn find_for_cost_center(
        pool: &DbPool,
        cost_center_id: i64,
        energy_category_id: i64,
        interval: &Interval,
    ) -> Result<Vec<Tariff>, AppError> {
        let rows = sqlx::query_as::<_, TariffRow>(
            r#"
            SELECT t.id, t.name, t.tariff_type,
                   t.valid_from_datetime_utc, t.valid_through_datetime_utc
            FROM tbl_tariffs t, tbl_cost_centers_tariffs cct
            WHERE t.energy_category_id = ?
              AND t.id = cct.tariff_id
              AND cct.cost_center_id = ?
              AND t.valid_through_datetime_utc >= ?
              AND t.valid_from_datetime_utc <= ?
            ORDER BY t.valid_from_datetime_utc
            "#,
        )
        .bind(energy_category_id)
        .bind(cost_center_id)
        .bind(interval.start().naive_utc())
        .bind(interval.end().naive_utc())
        .fetch_all(pool)
        .await
        .map_err(AppError::Db)?;

        let mut tariffs = Vec::with_capacity(rows.len());
        for row in rows {
            let tariff_type: TariffType = match row.tariff_type.parse() {
                Ok(t) => t,
                Err(e) => {
                    warn!(tariff_id = row.id, error = %e, "Skipping tariff");
                    continue;
                }
            };

            let blocks = match tariff_type {
                TariffType::TimeOfUse => Self::time_of_use_blocks(pool, row.id).await?,
                TariffType::Block => Vec::new(),
            };

            tariffs.push(Tariff {
                id: row.id,
                name: row.name,
                tariff_type,
                valid_from: row.valid_from_datetime_utc.and_utc(),
                valid_through: row.valid_through_datetime_utc.and_utc(),
                blocks,
            });
        }

        Ok(tariffs)
    }

    async fn time_of_use_blocks(
        pool: &DbPool,
        tariff_id: i64,
    ) -> Result<Vec<TimeOfUseBlock>, AppError> {
        sqlx::query_as::<_, TimeOfUseBlock>(
            r#"
            SELECT start_time_of_day, end_time_of_day, price
            FROM tbl_tariffs_timeofuses
            WHERE tariff_id = ?
            ORDER BY start_time_of_day
            "#,
        )
        .bind(tariff_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Db)
    }
}
