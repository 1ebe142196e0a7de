use crate::aggregation::UtcOffset;
use crate::config::JobConfig;
use crate::error::Result;
use crate::repositories::EnergyStore;
use crate::services::{MeterSavingService, ShopfloorStatisticsService};
use std::io::Write;
use std::sync::Arc;
use tracing::{error, info};

/// Runs configured report jobs and writes each report as pretty JSON.
#[derive(Clone)]
pub struct ReportRunner {
    meter_saving: MeterSavingService,
    shopfloor_statistics: ShopfloorStatisticsService,
}

impl ReportRunner {
    pub fn new(store: Arc<dyn EnergyStore>, offset: UtcOffset) -> Self {
        Self {
            meter_saving: MeterSavingService::new(store.clone(), offset),
            shopfloor_statistics: ShopfloorStatisticsService::new(store, offset),
        }
    }

    pub async fn render(&self, job: &JobConfig) -> Result<String> {
        let json = match job {
            JobConfig::MeterSaving(params) => {
                serde_json::to_string_pretty(&self.meter_saving.report(params).await?)?
            }
            JobConfig::ShopfloorStatistics(params) => {
                serde_json::to_string_pretty(&self.shopfloor_statistics.report(params).await?)?
            }
        };
        Ok(json)
    }

    /// Every job runs even after a failure; the run fails if any job did.
    pub async fn run<W: Write>(&self, jobs: &[JobConfig], out: &mut W) -> anyhow::Result<()> {
        let mut failed = 0usize;
        for (index, job) in jobs.iter().enumerate() {
            match self.render(job).await {
                Ok(json) => writeln!(out, "{}", json)?,
                Err(e) => {
                    failed += 1;
                    error!(job = index, report = job.name(), error = %e, "Report failed");
                }
            }
        }

        info!(
            completed = jobs.len() - failed,
            failed, "Report run complete"
        );
        if failed > 0 {
            anyhow::bail!("{} of {} reports failed", failed, jobs.len());
        }
        Ok(())
    }
}
