//! Data models for the cnweather application
//!
//! - Forecast: one normalized day of forecast data
//! - Region: the district a forecast is requested for

pub mod forecast;
pub mod region;

pub use forecast::ForecastRecord;
pub use region::RegionSelection;
