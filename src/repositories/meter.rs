use crate::db::DbPool;
use crate::error::AppError;
use crate::models::{EnergyCategory, Meter, MeterRef};
use sqlx::{mysql::MySqlRow, FromRow, Row};

const METER_COLUMNS: &str = r#"
    SELECT m.id, m.uuid, m.name, m.cost_center_id,
           ec.id AS energy_category_id, ec.name AS energy_category_name,
           ec.unit_of_measure, ec.kgce, ec.kgco2e
    FROM tbl_meters m, tbl_energy_categories ec
"#;

impl<'r> FromRow<'r, MySqlRow> for Meter {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            cost_center_id: row.try_get("cost_center_id")?,
            energy_category: EnergyCategory {
                id: row.try_get("energy_category_id")?,
                name: row.try_get("energy_category_name")?,
                unit_of_measure: row.try_get("unit_of_measure")?,
                kgce: row.try_get("kgce")?,
                kgco2e: row.try_get("kgco2e")?,
            },
        })
    }
}

pub struct MeterRepository;

impl MeterRepository {
    pub async fn find(pool: &DbPool, meter: &MeterRef) -> Result<Option<Meter>, AppError> {
        let query = match meter {
            MeterRef::Id(_) => format!(
                "{} WHERE m.id = ? AND m.energy_category_id = ec.id",
                METER_COLUMNS
            ),
            MeterRef::Uuid(_) => format!(
                "{} WHERE m.uuid = ? AND m.energy_category_id = ec.id",
                METER_COLUMNS
            ),
        };

        let query = sqlx::query_as::<_, Meter>(&query);
        let query = match meter {
            MeterRef::Id(id) => query.bind(*id),
            MeterRef::Uuid(uuid) => query.bind(uuid.clone()),
        };

        query.fetch_optional(pool).await.map_err(AppError::Db)
    }
}
