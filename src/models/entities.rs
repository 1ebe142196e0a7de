use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyCategory {
    pub id: i64,
    pub name: String,
    pub unit_of_measure: String,
    /// Kilogram coal equivalent per unit.
    pub kgce: Decimal,
    /// Kilogram CO2 equivalent per unit.
    pub kgco2e: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meter {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub cost_center_id: i64,
    pub energy_category: EnergyCategory,
}

/// A production area with its own floor area and cost center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shopfloor {
    pub id: i64,
    pub name: String,
    pub area: Option<Decimal>,
    pub cost_center_id: i64,
}

/// How a report request names its meter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterRef {
    Id(i64),
    Uuid(String),
}

impl std::fmt::Display for MeterRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeterRef::Id(id) => write!(f, "id={}", id),
            MeterRef::Uuid(uuid) => write!(f, "uuid={}", uuid),
        }
    }
}

/// Which hourly table family a series is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Metered consumption.
    Actual,
    /// Modelled consumption without energy-saving measures.
    Baseline,
}

/// Kind of a data point, which decides the historical table its values live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointObjectType {
    AnalogValue,
    EnergyValue,
    DigitalValue,
}

impl PointObjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            PointObjectType::AnalogValue => "ANALOG_VALUE",
            PointObjectType::EnergyValue => "ENERGY_VALUE",
            PointObjectType::DigitalValue => "DIGITAL_VALUE",
        }
    }
}

impl std::str::FromStr for PointObjectType {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ANALOG_VALUE" => Ok(PointObjectType::AnalogValue),
            "ENERGY_VALUE" => Ok(PointObjectType::EnergyValue),
            "DIGITAL_VALUE" => Ok(PointObjectType::DigitalValue),
            other => Err(crate::error::AppError::Validation(format!(
                "unknown point object type '{}'",
                other
            ))),
        }
    }
}

/// A measured quantity attached to a meter, a shopfloor or one of its sensors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub id: i64,
    pub name: String,
    pub units: String,
    pub object_type: PointObjectType,
}
