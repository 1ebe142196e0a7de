pub mod meter_saving;
pub mod request;
pub mod shopfloor_statistics;

pub use meter_saving::MeterSavingService;
pub use request::{
    MeterSavingParams, MeterSavingRequest, QuickMode, ReportWindow, ShopfloorStatisticsParams,
    ShopfloorStatisticsRequest,
};
pub use shopfloor_statistics::ShopfloorStatisticsService;
