// Batch runner over configured jobs.

use energy_report::aggregation::UtcOffset;
use energy_report::config::JobConfig;
use energy_report::runner::ReportRunner;
use energy_report::services::{MeterSavingParams, QuickMode};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Arc;
use test_helpers::*;


fn runner() -> ReportRunner {
    let store = InMemoryStore {
        meters: vec![main_meter()],
        categories: vec![electricity()],
        ..Default::default()
    };
    ReportRunner::new(Arc::new(store), UtcOffset::from_minutes(0).unwrap())
}

fn meter_job(meter_id: i64) -> JobConfig {
    JobConfig::MeterSaving(MeterSavingParams {
        meter_id: Some(meter_id),
        period_type: "daily".into(),
        reporting_period_start: "2024-01-01T00:00:00".into(),
        reporting_period_end: "2024-01-03T00:00:00".into(),
        quick_mode: QuickMode::parse("true"),
        ..Default::default()
    })
}

fn documents(output: &[u8]) -> Vec<Value> {
    serde_json::Deserializer::from_slice(output)
        .into_iter::<Value>()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[tokio::test]
async fn test_run_prints_every_report() {
    let mut output = Vec::new();
    runner()
        .run(&[meter_job(1), meter_job(1)], &mut output)
        .await
        .unwrap();

    let docs = documents(&output);
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["meter"]["name"], "Main meter");
}

#[tokio::test]
async fn test_run_fails_when_any_job_fails() {
    let mut output = Vec::new();
    let err = runner()
        .run(&[meter_job(99), meter_job(1)], &mut output)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "1 of 2 reports failed");
    // the failing job does not stop the ones after it
    assert_eq!(documents(&output).len(), 1);
}
