use crate::db::DbPool;
use crate::error::AppError;
use crate::models::{EnergyCategory, Shopfloor};
use sqlx::{mysql::MySqlRow, FromRow, Row};

impl<'r> FromRow<'r, MySqlRow> for Shopfloor {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            area: row.try_get("area")?,
            cost_center_id: row.try_get("cost_center_id")?,
        })
    }
}

impl<'r> FromRow<'r, MySqlRow> for EnergyCategory {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            unit_of_measure: row.try_get("unit_of_measure")?,
            kgce: row.try_get("kgce")?,
            kgco2e: row.try_get("kgco2e")?,
        })
    }
}

pub struct ShopfloorRepository;

impl ShopfloorRepository {
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Shopfloor>, AppError> {
        sqlx::query_as::<_, Shopfloor>(
            r#"
            SELECT id, name, area, cost_center_id
            FROM tbl_shopfloors
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Db)
    }
}

pub struct EnergyCategoryRepository;

impl EnergyCategoryRepository {
    pub async fn list_all(pool: &DbPool) -> Result<Vec<EnergyCategory>, AppError> {
        sqlx::query_as::<_, EnergyCategory>(
            r#"
            SELECT id, name, unit_of_measure, kgce, kgco2e
            FROM tbl_energy_categories
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(AppError::Db)
    }
}
