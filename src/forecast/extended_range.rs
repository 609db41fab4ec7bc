//! 15-day page layout
//!
//! Each entry is five inline spans, read by position:
//!
//! ```text
//! div#15d.c15d > ul.t.clearfix > li
//!     span[0]  周三（10日）
//!     span[1]  晴
//!     span[2]  <em>22℃</em>/10℃
//!     span[3]  西北风        (direction, unused)
//!     span[4]  3-4级
//! ```

use super::normalize::{clean_temperature, element_text, reorder_extended_date};
use super::selector;
use crate::models::ForecastRecord;
use crate::{CnWeatherError, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, warn};

/// Number of entries consumed from the 15-day page (days 8-15)
pub const EXTENDED_ENTRY_LIMIT: usize = 7;

const DATE_FIELD: usize = 0;
const WEATHER_FIELD: usize = 1;
const TEMPERATURE_FIELD: usize = 2;
const WIND_POWER_FIELD: usize = 4;

struct ExtendedRangeSelectors {
    container: Selector,
    list: Selector,
    entry: Selector,
    field: Selector,
    high: Selector,
}

impl ExtendedRangeSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            container: selector(r#"div[id="15d"].c15d"#)?,
            list: selector("ul.t.clearfix")?,
            entry: selector("li")?,
            field: selector("span")?,
            high: selector("em")?,
        })
    }
}

/// Parse up to [`EXTENDED_ENTRY_LIMIT`] entries of a 15-day page
///
/// Shorter lists yield fewer records. Entries with fewer than five fields
/// treat the missing positions as absent fields.
pub fn parse_extended_range(html: &str) -> Result<Vec<ForecastRecord>> {
    let mut records = parse_extended_entries(html)?;
    if records.len() < EXTENDED_ENTRY_LIMIT {
        debug!(
            "15-day page has only {} entries, expected {}",
            records.len(),
            EXTENDED_ENTRY_LIMIT
        );
    }
    records.truncate(EXTENDED_ENTRY_LIMIT);
    Ok(records)
}

/// Parse every entry of a 15-day page, in page order
///
/// The merge in [`super::ForecastNormalizer::fetch`] needs the entries past
/// the limit when the first one repeats a 7-day date.
pub fn parse_extended_entries(html: &str) -> Result<Vec<ForecastRecord>> {
    let selectors = ExtendedRangeSelectors::new()?;
    let document = Html::parse_document(html);

    let container = document.select(&selectors.container).next().ok_or_else(|| {
        error!("15-day forecast container not found");
        CnWeatherError::structural("15-day forecast container (div#15d.c15d) not found")
    })?;

    let list = container.select(&selectors.list).next().ok_or_else(|| {
        error!("15-day forecast list not found");
        CnWeatherError::structural("15-day forecast list (ul.t.clearfix) not found")
    })?;

    let records: Vec<ForecastRecord> = list
        .select(&selectors.entry)
        .map(|entry| parse_entry(entry, &selectors))
        .collect();

    if records.is_empty() {
        error!("15-day forecast list has no entries");
        return Err(CnWeatherError::structural(
            "15-day forecast list contains no day entries",
        ));
    }

    Ok(records)
}

fn parse_entry(entry: ElementRef<'_>, selectors: &ExtendedRangeSelectors) -> ForecastRecord {
    let fields: Vec<ElementRef<'_>> = entry.select(&selectors.field).collect();
    if fields.len() <= WIND_POWER_FIELD {
        warn!("15-day entry has only {} inline fields", fields.len());
    }

    let text_at = |index: usize| fields.get(index).copied().and_then(element_text);

    let date = text_at(DATE_FIELD)
        .map(|raw| reorder_extended_date(&raw))
        .unwrap_or_default();

    let (high_temp, low_temp) = match fields.get(TEMPERATURE_FIELD) {
        Some(temperature) => {
            let high = temperature
                .select(&selectors.high)
                .next()
                .and_then(|high| clean_temperature(&high.text().collect::<String>()));
            let text = temperature.text().collect::<String>();
            let low = if text.contains('/') {
                text.rsplit('/').next().and_then(clean_temperature)
            } else {
                None
            };
            (high, low)
        }
        None => (None, None),
    };

    ForecastRecord::new(
        date,
        high_temp,
        low_temp,
        text_at(WEATHER_FIELD),
        text_at(WIND_POWER_FIELD),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, weather: &str, high: u32, low: u32) -> String {
        format!(
            r#"<li class="t"><span class="time">{date}</span><span class="wea">{weather}</span><span class="tem"><em>{high}℃</em>/{low}℃</span><span class="wind">西北风</span><span class="wind1">3-4级</span></li>"#
        )
    }

    fn page(entries: &str) -> String {
        format!(
            r#"<html><body><div id="15d" class="c15d"><ul class="t clearfix">{entries}</ul></div></body></html>"#
        )
    }

    #[test]
    fn test_parse_full_entry() {
        let html = page(&entry("周三（10日）", "晴", 22, 10));

        let records = parse_extended_range(&html).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.date(), "10日（周三）");
        assert_eq!(record.weather(), Some("晴"));
        assert_eq!(record.high_temp(), "22");
        assert_eq!(record.low_temp(), "10");
        assert_eq!(record.wind_power(), Some("3-4级"));
    }

    #[test]
    fn test_only_first_seven_entries_are_consumed() {
        let entries: String = (10..18)
            .map(|day| entry(&format!("周一（{day}日）"), "多云", 20, 8))
            .collect();

        let records = parse_extended_range(&page(&entries)).unwrap();
        assert_eq!(records.len(), EXTENDED_ENTRY_LIMIT);
        assert_eq!(records[0].date(), "10日（周一）");
        assert_eq!(records[6].date(), "16日（周一）");
    }

    #[test]
    fn test_parse_extended_entries_keeps_every_entry() {
        let entries: String = (9..17)
            .map(|day| entry(&format!("周一（{day}日）"), "多云", 20, 8))
            .collect();

        let records = parse_extended_entries(&page(&entries)).unwrap();
        assert_eq!(records.len(), 8);
        assert_eq!(records[7].date(), "16日（周一）");
    }

    #[test]
    fn test_short_list_truncates_gracefully() {
        let entries = entry("周三（10日）", "晴", 22, 10) + &entry("周四（11日）", "阴", 18, 9);
        let records = parse_extended_range(&page(&entries)).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_entry_with_missing_fields() {
        let html = page(r#"<li><span>周五（12日）</span><span>雨</span></li>"#);

        let record = &parse_extended_range(&html).unwrap()[0];
        assert_eq!(record.date(), "12日（周五）");
        assert_eq!(record.weather(), Some("雨"));
        assert_eq!(record.high_temp(), "0");
        assert_eq!(record.low_temp(), "0");
        assert_eq!(record.wind_power(), None);
    }

    #[test]
    fn test_temperature_without_low_is_backfilled() {
        let html = page(
            r#"<li><span>周五（12日）</span><span>雨</span><span><em>15℃</em></span><span>北风</span><span>&lt;3级</span></li>"#,
        );

        let record = &parse_extended_range(&html).unwrap()[0];
        assert_eq!(record.high_temp(), "15");
        assert_eq!(record.low_temp(), "15");
        assert_eq!(record.wind_power(), Some("<3级"));
    }

    #[test]
    fn test_malformed_date_passes_through() {
        let html = page(&entry("12日", "晴", 1, 0));
        let record = &parse_extended_range(&html).unwrap()[0];
        assert_eq!(record.date(), "12日");
    }

    #[test]
    fn test_missing_container_is_structural_error() {
        let html = r#"<div id="7d" class="c7d"><ul class="t clearfix"><li></li></ul></div>"#;
        let err = parse_extended_range(html).unwrap_err();
        assert!(matches!(err, CnWeatherError::StructuralMismatch { .. }));
    }
}
