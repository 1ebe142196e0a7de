use energy_report::repositories::{EnergyStore, MySqlEnergyStore};
use energy_report::runner::ReportRunner;
use energy_report::{Config, Databases};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("Starting energy-report");

    let cfg_path = std::env::var("APP_CONFIG").unwrap_or_else(|_| "config/config.yaml".into());
    let cfg = Config::load(&cfg_path)?;
    let offset = cfg.reporting.utc_offset()?;
    info!(jobs = cfg.jobs.len(), utc_offset = %offset, "Configuration loaded");

    let dbs = Databases::connect(&cfg.database).await?;
    let store: Arc<dyn EnergyStore> = Arc::new(MySqlEnergyStore::new(dbs));

    let runner = ReportRunner::new(store, offset);
    runner.run(&cfg.jobs, &mut std::io::stdout().lock()).await
}
