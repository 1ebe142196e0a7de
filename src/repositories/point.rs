use crate::aggregation::{Interval, Sample};
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::{Point, PointObjectType};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{mysql::MySqlRow, FromRow, Row};
use tracing::warn;

#[derive(Debug, Clone)]
struct PointRow {
    id: i64,
    name: String,
    units: String,
    object_type: String,
}

impl<'r> FromRow<'r, MySqlRow> for PointRow {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            units: row.try_get("units")?,
            object_type: row.try_get("object_type")?,
        })
    }
}

#[derive(Debug, Clone)]
struct PointValueRow {
    utc_date_time: NaiveDateTime,
    actual_value: Option<Decimal>,
}

impl<'r> FromRow<'r, MySqlRow> for PointValueRow {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            utc_date_time: row.try_get("utc_date_time")?,
            actual_value: row.try_get("actual_value")?,
        })
    }
}

fn into_points(rows: Vec<PointRow>) -> Vec<Point> {
    rows.into_iter()
        .filter_map(|row| match row.object_type.parse::<PointObjectType>() {
            Ok(object_type) => Some(Point {
                id: row.id,
                name: row.name,
                units: row.units,
                object_type,
            }),
            Err(e) => {
                warn!(point_id = row.id, error = %e, "Skipping point");
                None
            }
        })
        .collect()
}

pub struct PointRepository;

impl PointRepository {
    pub async fn for_meter(pool: &DbPool, meter_id: i64) -> Result<Vec<Point>, AppError> {
        let rows = sqlx::query_as::<_, PointRow>(
            r#"
            SELECT po.id, po.name, po.units, po.object_type
            FROM tbl_meters_points mepo, tbl_points po
            WHERE mepo.meter_id = ? AND mepo.point_id = po.id
            ORDER BY po.id
            "#,
        )
        .bind(meter_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Db)?;

        Ok(into_points(rows))
    }

    /// Points of the shopfloor's sensors, then the shopfloor's own points.
    pub async fn for_shopfloor(pool: &DbPool, shopfloor_id: i64) -> Result<Vec<Point>, AppError> {
        let mut rows = sqlx::query_as::<_, PointRow>(
            r#"
            SELECT p.id, p.name, p.units, p.object_type
            FROM tbl_shopfloors_sensors ss, tbl_sensors_points sp, tbl_points p
            WHERE ss.shopfloor_id = ? AND ss.sensor_id = sp.sensor_id AND sp.point_id = p.id
            ORDER BY p.id
            "#,
        )
        .bind(shopfloor_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Db)?;

        rows.extend(
            sqlx::query_as::<_, PointRow>(
                r#"
                SELECT p.id, p.name, p.units, p.object_type
                FROM tbl_shopfloors_points sp, tbl_points p
                WHERE sp.shopfloor_id = ? AND sp.point_id = p.id
                ORDER BY p.id
                "#,
            )
            .bind(shopfloor_id)
            .fetch_all(pool)
            .await
            .map_err(AppError::Db)?,
        );

        Ok(into_points(rows))
    }

    /// Raw readings of a point with both interval bounds included.
    pub async fn values(
        pool: &DbPool,
        point: &Point,
        interval: &Interval,
    ) -> Result<Vec<Sample>, AppError> {
        let table = match point.object_type {
            PointObjectType::AnalogValue => "tbl_analog_value",
            PointObjectType::EnergyValue => "tbl_energy_value",
            PointObjectType::DigitalValue => "tbl_digital_value",
        };
        // digital values are integers; cast so every table decodes the same way
        let query = format!(
            r#"
            SELECT utc_date_time, CAST(actual_value AS DECIMAL(30, 6)) AS actual_value
            FROM {}
            WHERE point_id = ?
              AND utc_date_time BETWEEN ? AND ?
            ORDER BY utc_date_time
            "#,
            table
        );

        let rows = sqlx::query_as::<_, PointValueRow>(&query)
            .bind(point.id)
            .bind(interval.start().naive_utc())
            .bind(interval.end().naive_utc())
            .fetch_all(pool)
            .await
            .map_err(AppError::Db)?;

        Ok(rows
            .into_iter()
            .map(|row| Sample::new(row.utc_date_time.and_utc(), row.actual_value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unknown_object_types_are_dropped() {
        let row = |id, object_type: &str| PointRow {
            id,
            name: format!("p{}", id),
            units: "kW".into(),
            object_type: object_type.into(),
        };
        let points = into_points(vec![
            row(1, "ANALOG_VALUE"),
            row(2, "TEXT_VALUE"),
            row(3, "DIGITAL_VALUE"),
        ]);
        assert_eq!(points.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(points[1].object_type, PointObjectType::DigitalValue);
    }
}
