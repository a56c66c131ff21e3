pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::create_pool;
pub use error::{AppError, ForecastError, RepositoryError};
pub use service::{run_pipeline, ForecastService};
