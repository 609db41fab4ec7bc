//! Daily forecast record produced by the forecast normalizer

use serde::Serialize;

/// Placeholder used when a page provides neither temperature
pub const MISSING_TEMPERATURE: &str = "0";

/// One calendar day's forecast
///
/// Records are only built through [`ForecastRecord::new`], which applies the
/// temperature backfill so that both temperatures are always set.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ForecastRecord {
    /// Display date such as `3日（周三）`
    date: String,
    /// Daytime high in Celsius, unit stripped
    high_temp: String,
    /// Night low in Celsius, unit stripped
    low_temp: String,
    /// Condition description, e.g. `晴` or `小雨`
    weather: Option<String>,
    /// Wind descriptor, e.g. `<3级`
    wind_power: Option<String>,
}

impl ForecastRecord {
    /// Create a record, backfilling a missing temperature from the other one
    #[must_use]
    pub fn new(
        date: impl Into<String>,
        high_temp: Option<String>,
        low_temp: Option<String>,
        weather: Option<String>,
        wind_power: Option<String>,
    ) -> Self {
        let (high_temp, low_temp) = match (high_temp, low_temp) {
            (Some(high), Some(low)) => (high, low),
            (Some(high), None) => (high.clone(), high),
            (None, Some(low)) => (low.clone(), low),
            (None, None) => (
                MISSING_TEMPERATURE.to_string(),
                MISSING_TEMPERATURE.to_string(),
            ),
        };

        Self {
            date: date.into(),
            high_temp,
            low_temp,
            weather,
            wind_power,
        }
    }

    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    #[must_use]
    pub fn high_temp(&self) -> &str {
        &self.high_temp
    }

    #[must_use]
    pub fn low_temp(&self) -> &str {
        &self.low_temp
    }

    #[must_use]
    pub fn weather(&self) -> Option<&str> {
        self.weather.as_deref()
    }

    #[must_use]
    pub fn wind_power(&self) -> Option<&str> {
        self.wind_power.as_deref()
    }

    /// Day part of the date, i.e. everything before `（`
    #[must_use]
    pub fn day_label(&self) -> &str {
        self.date.split('（').next().unwrap_or(&self.date)
    }

    /// High temperature in whole degrees, truncated toward zero
    #[must_use]
    pub fn high_celsius(&self) -> Option<i32> {
        whole_degrees(&self.high_temp)
    }

    /// Low temperature in whole degrees, truncated toward zero
    #[must_use]
    pub fn low_celsius(&self) -> Option<i32> {
        whole_degrees(&self.low_temp)
    }
}

fn whole_degrees(value: &str) -> Option<i32> {
    let degrees = value.trim().parse::<f64>().ok()?;
    if degrees.is_finite() {
        // `as` saturates, which is fine for any real temperature
        Some(degrees.trunc() as i32)
    } else {
        None
    }
}
