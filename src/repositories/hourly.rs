use crate::aggregation::{Interval, Sample};
use crate::db::DbPool;
use crate::error::AppError;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{mysql::MySqlRow, FromRow, Row};

/// One row of an `*_hourly` table. Timestamps are stored as naive UTC.
#[derive(Debug, Clone)]
struct HourlyRow {
    start_datetime_utc: NaiveDateTime,
    actual_value: Option<Decimal>,
}

impl<'r> FromRow<'r, MySqlRow> for HourlyRow {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            start_datetime_utc: row.try_get("start_datetime_utc")?,
            actual_value: row.try_get("actual_value")?,
        })
    }
}

impl From<HourlyRow> for Sample {
    fn from(row: HourlyRow) -> Self {
        Sample::new(row.start_datetime_utc.and_utc(), row.actual_value)
    }
}

pub struct HourlyRepository;

impl HourlyRepository {
    /// Hourly meter energy. The same table exists in the energy and the
    /// baseline database; `pool` picks which one.
    pub async fn meter_hourly(
        pool: &DbPool,
        meter_id: i64,
        interval: &Interval,
    ) -> Result<Vec<Sample>, AppError> {
        let rows = sqlx::query_as::<_, HourlyRow>(
            r#"
            SELECT start_datetime_utc, actual_value
            FROM tbl_meter_hourly
            WHERE meter_id = ?
              AND start_datetime_utc >= ?
              AND start_datetime_utc < ?
            ORDER BY start_datetime_utc
            "#,
        )
        .bind(meter_id)
        .bind(interval.start().naive_utc())
        .bind(interval.end().naive_utc())
        .fetch_all(pool)
        .await
        .map_err(AppError::Db)?;

        Ok(rows.into_iter().map(Sample::from).collect())
    }

    pub async fn shopfloor_hourly(
        pool: &DbPool,
        shopfloor_id: i64,
        energy_category_id: i64,
        interval: &Interval,
    ) -> Result<Vec<Sample>, AppError> {
        let rows = sqlx::query_as::<_, HourlyRow>(
            r#"
            SELECT start_datetime_utc, actual_value
            FROM tbl_shopfloor_input_category_hourly
            WHERE shopfloor_id = ?
              AND energy_category_id = ?
              AND start_datetime_utc >= ?
              AND start_datetime_utc < ?
            ORDER BY start_datetime_utc
            "#,
        )
        .bind(shopfloor_id)
        .bind(energy_category_id)
        .bind(interval.start().naive_utc())
        .bind(interval.end().naive_utc())
        .fetch_all(pool)
        .await
        .map_err(AppError::Db)?;

        Ok(rows.into_iter().map(Sample::from).collect())
    }

    /// Ids of the energy categories a shopfloor has input for in `interval`.
    pub async fn shopfloor_category_ids(
        pool: &DbPool,
        shopfloor_id: i64,
        interval: &Interval,
    ) -> Result<Vec<i64>, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT DISTINCT energy_category_id
            FROM tbl_shopfloor_input_category_hourly
            WHERE shopfloor_id = ?
              AND start_datetime_utc >= ?
              AND start_datetime_utc < ?
            "#,
        )
        .bind(shopfloor_id)
        .bind(interval.start().naive_utc())
        .bind(interval.end().naive_utc())
        .fetch_all(pool)
        .await
        .map_err(AppError::Db)
    }
}
