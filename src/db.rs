use crate::config::DbConfig;
use crate::error::AppError;
use sqlx::{mysql::MySqlPoolOptions, MySql, Pool};
use tracing::info;

pub type DbPool = Pool<MySql>;

pub async fn connect(url: &str, max_connections: u32) -> Result<DbPool, AppError> {
    let pool = MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;
    Ok(pool)
}

/// The databases a report reads from.
#[derive(Debug, Clone)]
pub struct Databases {
    pub system: DbPool,
    pub energy: DbPool,
    pub energy_baseline: DbPool,
    pub historical: DbPool,
}

impl Databases {
    pub async fn connect(cfg: &DbConfig) -> Result<Self, AppError> {
        let system = connect(&cfg.system_url, cfg.max_connections).await?;
        info!("Connected to system database");
        let energy = connect(&cfg.energy_url, cfg.max_connections).await?;
        info!("Connected to energy database");
        let energy_baseline = connect(&cfg.energy_baseline_url, cfg.max_connections).await?;
        info!("Connected to energy baseline database");
        let historical = connect(&cfg.historical_url, cfg.max_connections).await?;
        info!("Connected to historical database");

        Ok(Self {
            system,
            energy,
            energy_baseline,
            historical,
        })
    }
}
