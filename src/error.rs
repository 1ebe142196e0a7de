use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid period type: {0}")]
    InvalidPeriodType(String),
    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval { start: String, end: String },
    #[error("Invalid UTC offset: {0}")]
    InvalidUtcOffset(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Bucket layouts differ: {0}")]
    LayoutMismatch(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("DB error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
