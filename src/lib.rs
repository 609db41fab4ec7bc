//! `cnweather` - 15-day weather forecasts for Chinese regions
//!
//! This library scrapes the 7-day and 15-day forecast pages of
//! weather.com.cn, normalizes both layouts into one list of daily records,
//! and renders them as a terminal temperature chart.

pub mod chart;
pub mod config;
pub mod error;
pub mod forecast;
pub mod models;
pub mod region;

// Re-export core types for public API
pub use config::CnWeatherConfig;
pub use error::CnWeatherError;
pub use forecast::{ForecastNormalizer, HttpPageSource, PageSource};
pub use models::{ForecastRecord, RegionSelection};
pub use region::{RegionPicker, RegionTree};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, CnWeatherError>;
