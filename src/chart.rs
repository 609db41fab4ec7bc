//! Terminal temperature chart
//!
//! One row per day: the day label, a low..high bar on a scale shared by all
//! rows, then condition and wind.

use crate::config::ChartConfig;
use crate::models::ForecastRecord;
use crate::{CnWeatherError, Result};

const TITLE_SUFFIX: &str = "未来15天天气预报";
const RANGE_CELL: char = '█';
const EMPTY_CELL: char = '·';
const UNSET: &str = "-";

/// Chart title, prefixed with the region name when known
#[must_use]
pub fn title(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => format!("{name}{TITLE_SUFFIX}"),
        _ => TITLE_SUFFIX.to_string(),
    }
}

/// Render records as a text chart
#[must_use]
pub fn render(records: &[ForecastRecord], name: Option<&str>, config: &ChartConfig) -> String {
    let mut out = format!("{}\n", title(name));

    if records.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let width = usize::try_from(config.width).unwrap_or(40).max(2);
    let scale = Scale::for_records(records);

    for record in records {
        out.push_str(&row(record, scale, width));
        out.push('\n');
    }

    out
}

/// Records as pretty JSON
pub fn render_json(records: &[ForecastRecord]) -> Result<String> {
    serde_json::to_string_pretty(records)
        .map_err(|e| CnWeatherError::output(format!("Failed to serialize forecast: {e}")))
}

fn row(record: &ForecastRecord, scale: Option<Scale>, width: usize) -> String {
    let low = record.low_celsius();
    let high = record.high_celsius();

    let bar = match (low, high, scale) {
        (Some(low), Some(high), Some(scale)) => scale.bar(low.min(high), low.max(high), width),
        _ => EMPTY_CELL.to_string().repeat(width),
    };

    format!(
        "{:<6} {:>5} {} {:<5}  {} {}",
        record.day_label(),
        degrees(low),
        bar,
        degrees(high),
        record.weather().unwrap_or(UNSET),
        record.wind_power().unwrap_or(UNSET),
    )
}

fn degrees(value: Option<i32>) -> String {
    value.map_or_else(|| "?".to_string(), |v| format!("{v}℃"))
}

#[derive(Debug, Clone, Copy)]
struct Scale {
    min: i32,
    max: i32,
}

impl Scale {
    fn for_records(records: &[ForecastRecord]) -> Option<Self> {
        let values: Vec<i32> = records
            .iter()
            .flat_map(|r| [r.low_celsius(), r.high_celsius()])
            .flatten()
            .collect();

        Some(Self {
            min: *values.iter().min()?,
            max: *values.iter().max()?,
        })
    }

    fn cell(self, value: i32, width: usize) -> usize {
        // i64 so that saturated extremes cannot overflow
        let span = (i64::from(self.max) - i64::from(self.min)).max(1);
        let offset = i64::from(value) - i64::from(self.min);
        let last = i64::try_from(width - 1).unwrap_or(0);
        usize::try_from(offset * last / span).unwrap_or(0)
    }

    fn bar(self, low: i32, high: i32, width: usize) -> String {
        let start = self.cell(low, width);
        let end = self.cell(high, width);
        (0..width)
            .map(|i| if (start..=end).contains(&i) { RANGE_CELL } else { EMPTY_CELL })
            .collect()
    }
}
