//! Report parameters as callers supply them, and their validated form.

use crate::aggregation::{Interval, PeriodType, UtcOffset};
use crate::error::{AppError, Result};
use crate::models::MeterRef;
use serde::Deserialize;
use tracing::debug;

/// Quick mode skips the tariff timeline and other auxiliary series.
///
/// Accepts a boolean or one of `true`, `t`, `on`, `yes`, `y` in any case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "FlagValue")]
pub struct QuickMode(bool);

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Text(String),
}

impl From<FlagValue> for QuickMode {
    fn from(value: FlagValue) -> Self {
        match value {
            FlagValue::Bool(b) => QuickMode(b),
            FlagValue::Text(s) => QuickMode::parse(&s),
        }
    }
}

impl QuickMode {
    pub fn parse(value: &str) -> Self {
        let value = value.trim().to_ascii_lowercase();
        QuickMode(matches!(value.as_str(), "true" | "t" | "on" | "yes" | "y"))
    }

    pub fn is_enabled(self) -> bool {
        self.0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeterSavingParams {
    #[serde(default)]
    pub meter_id: Option<i64>,
    #[serde(default)]
    pub meter_uuid: Option<String>,
    pub period_type: String,
    #[serde(default)]
    pub base_period_start: Option<String>,
    #[serde(default)]
    pub base_period_end: Option<String>,
    pub reporting_period_start: String,
    pub reporting_period_end: String,
    #[serde(default)]
    pub quick_mode: QuickMode,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopfloorStatisticsParams {
    pub shopfloor_id: i64,
    pub period_type: String,
    #[serde(default)]
    pub base_period_start: Option<String>,
    #[serde(default)]
    pub base_period_end: Option<String>,
    pub reporting_period_start: String,
    pub reporting_period_end: String,
    #[serde(default)]
    pub quick_mode: QuickMode,
}

/// The time frame shared by every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub period_type: PeriodType,
    /// Comparison period; absent when the caller did not ask for one.
    pub base: Option<Interval>,
    pub reporting: Interval,
    pub quick_mode: bool,
}

impl ReportWindow {
    pub fn parse(
        period_type: &str,
        base: (Option<&str>, Option<&str>),
        reporting: (&str, &str),
        quick_mode: QuickMode,
        offset: UtcOffset,
    ) -> Result<Self> {
        let period_type: PeriodType = period_type.parse()?;

        let base_start = non_blank(base.0)
            .map(|v| offset.parse_local(v))
            .transpose()?;
        let base_end = non_blank(base.1)
            .map(|v| offset.parse_local(v))
            .transpose()?;
        let base = match (base_start, base_end) {
            (Some(start), Some(end)) => Some(Interval::new(start, end)?),
            (None, None) => None,
            (start, end) => {
                debug!(?start, ?end, "Incomplete base period ignored");
                None
            }
        };

        let reporting = Interval::new(
            offset.parse_local(reporting.0)?,
            offset.parse_local(reporting.1)?,
        )?;

        Ok(Self {
            period_type,
            base,
            reporting,
            quick_mode: quick_mode.is_enabled(),
        })
    }

    /// Every interval the report reads, base first.
    pub fn intervals(&self) -> Vec<Interval> {
        self.base.iter().copied().chain(Some(self.reporting)).collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Version-4 UUID, with or without hyphens.
fn is_valid_uuid(value: &str) -> bool {
    let hex: Vec<char> = value.chars().filter(|c| *c != '-').collect();
    hex.len() == 32
        && value.len() - hex.len() <= 4
        && hex.iter().all(|c| c.is_ascii_hexdigit())
        && hex[12] == '4'
        && matches!(hex[16].to_ascii_lowercase(), '8' | '9' | 'a' | 'b')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterSavingRequest {
    pub meter: MeterRef,
    pub window: ReportWindow,
}

impl MeterSavingRequest {
    pub fn from_params(params: &MeterSavingParams, offset: UtcOffset) -> Result<Self> {
        let uuid = params.meter_uuid.as_deref().map(str::trim);
        if let Some(uuid) = uuid.filter(|u| !is_valid_uuid(u)) {
            return Err(AppError::Validation(format!("invalid meter uuid '{}'", uuid)));
        }
        let meter = match (params.meter_id, uuid) {
            (Some(id), _) if id <= 0 => {
                return Err(AppError::Validation(format!("invalid meter id {}", id)))
            }
            (Some(id), _) => MeterRef::Id(id),
            (None, Some(uuid)) => MeterRef::Uuid(uuid.to_string()),
            (None, None) => {
                return Err(AppError::Validation("meter id or uuid is required".into()))
            }
        };

        let window = ReportWindow::parse(
            &params.period_type,
            (
                params.base_period_start.as_deref(),
                params.base_period_end.as_deref(),
            ),
            (&params.reporting_period_start, &params.reporting_period_end),
            params.quick_mode,
            offset,
        )?;

        Ok(Self { meter, window })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopfloorStatisticsRequest {
    pub shopfloor_id: i64,
    pub window: ReportWindow,
}

impl ShopfloorStatisticsRequest {
    pub fn from_params(params: &ShopfloorStatisticsParams, offset: UtcOffset) -> Result<Self> {
        if params.shopfloor_id <= 0 {
            return Err(AppError::Validation(format!(
                "invalid shopfloor id {}",
                params.shopfloor_id
            )));
        }

        let window = ReportWindow::parse(
            &params.period_type,
            (
                params.base_period_start.as_deref(),
                params.base_period_end.as_deref(),
            ),
            (&params.reporting_period_start, &params.reporting_period_end),
            params.quick_mode,
            offset,
        )?;

        Ok(Self {
            shopfloor_id: params.shopfloor_id,
            window,
        })
    }
}
