pub mod aggregation;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod runner;
pub mod services;
pub mod tariff;

pub use config::Config;
pub use db::Databases;
pub use error::{AppError, Result};
