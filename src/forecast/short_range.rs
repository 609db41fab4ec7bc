//! 7-day page layout
//!
//! ```text
//! div#7d.c7d > ul.t.clearfix > li
//!     h1          3日（星期三）
//!     p.wea       title="晴转多云"
//!     p.tem       <span>25</span>/<i>12℃</i>
//!     p.win       <em>..</em><i>&lt;3级</i>
//! ```

use super::normalize::{abbreviate_weekday, clean_temperature, element_text};
use super::selector;
use crate::models::ForecastRecord;
use crate::{CnWeatherError, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error};

struct ShortRangeSelectors {
    container: Selector,
    list: Selector,
    entry: Selector,
    date: Selector,
    weather: Selector,
    temperature: Selector,
    high: Selector,
    low: Selector,
    wind_power: Selector,
}

impl ShortRangeSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            container: selector(r#"div[id="7d"].c7d"#)?,
            list: selector("ul.t.clearfix")?,
            entry: selector("li")?,
            date: selector("h1")?,
            weather: selector("p.wea")?,
            temperature: selector("p.tem")?,
            high: selector("span")?,
            low: selector("i")?,
            wind_power: selector("p.win i")?,
        })
    }
}

/// Parse every day entry of a 7-day page
///
/// All-or-nothing: a missing container, list or an empty list fails the
/// whole page. Missing per-day fields are handled by the normalization rules.
pub fn parse_short_range(html: &str) -> Result<Vec<ForecastRecord>> {
    let selectors = ShortRangeSelectors::new()?;
    let document = Html::parse_document(html);

    let container = document.select(&selectors.container).next().ok_or_else(|| {
        error!("7-day forecast container not found");
        CnWeatherError::structural("7-day forecast container (div#7d.c7d) not found")
    })?;

    let list = container.select(&selectors.list).next().ok_or_else(|| {
        error!("7-day forecast list not found");
        CnWeatherError::structural("7-day forecast list (ul.t.clearfix) not found")
    })?;

    let records: Vec<ForecastRecord> = list
        .select(&selectors.entry)
        .map(|entry| parse_entry(entry, &selectors))
        .collect();

    if records.is_empty() {
        error!("7-day forecast list has no entries");
        return Err(CnWeatherError::structural(
            "7-day forecast list contains no day entries",
        ));
    }

    debug!("Parsed {} short-range entries", records.len());
    Ok(records)
}

fn parse_entry(entry: ElementRef<'_>, selectors: &ShortRangeSelectors) -> ForecastRecord {
    let date = match entry.select(&selectors.date).next().and_then(element_text) {
        Some(raw) => abbreviate_weekday(&raw),
        None => {
            debug!("Short-range entry without a day label");
            String::new()
        }
    };

    let weather = entry.select(&selectors.weather).next().and_then(|condition| {
        condition
            .value()
            .attr("title")
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_string)
            .or_else(|| element_text(condition))
    });

    let (high_temp, low_temp) = match entry.select(&selectors.temperature).next() {
        Some(temperature) => (
            temperature
                .select(&selectors.high)
                .next()
                .and_then(|high| clean_temperature(&high.text().collect::<String>())),
            temperature
                .select(&selectors.low)
                .next()
                .and_then(|low| clean_temperature(&low.text().collect::<String>())),
        ),
        None => (None, None),
    };

    if high_temp.is_none() || low_temp.is_none() {
        debug!("Backfilling temperatures for {}", date);
    }

    let wind_power = entry.select(&selectors.wind_power).next().and_then(element_text);

    ForecastRecord::new(date, high_temp, low_temp, weather, wind_power)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(entries: &str) -> String {
        format!(
            r#"<html><body><div id="7d" class="c7d"><ul class="t clearfix">{entries}</ul></div></body></html>"#
        )
    }

    #[test]
    fn test_parse_full_entry() {
        let html = page(
            r#"<li class="sky skyid lv2">
                <h1>3日（星期三）</h1>
                <p title="晴转多云" class="wea">晴</p>
                <p class="tem"><span>25</span>/<i>12℃</i></p>
                <p class="win"><em><span title="南风" class="S"></span></em><i>&lt;3级</i></p>
            </li>"#,
        );

        let records = parse_short_range(&html).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.date(), "3日（周三）");
        assert_eq!(record.weather(), Some("晴转多云"));
        assert_eq!(record.high_temp(), "25");
        assert_eq!(record.low_temp(), "12");
        assert_eq!(record.wind_power(), Some("<3级"));
    }

    #[test]
    fn test_weather_falls_back_to_text() {
        let html = page(
            r#"<li><h1>4日（今天）</h1><p class="wea">小雨</p>
               <p class="tem"><span>9℃</span>/<i>3℃</i></p></li>"#,
        );

        let record = &parse_short_range(&html).unwrap()[0];
        assert_eq!(record.weather(), Some("小雨"));
        assert_eq!(record.wind_power(), None);
    }

    #[test]
    fn test_missing_high_is_backfilled() {
        let html = page(
            r#"<li><h1>3日（今天）</h1><p class="wea">晴</p>
               <p class="tem"><i>5℃</i></p></li>"#,
        );

        let record = &parse_short_range(&html).unwrap()[0];
        assert_eq!(record.high_temp(), "5");
        assert_eq!(record.low_temp(), "5");
    }

    #[test]
    fn test_missing_temperature_block_defaults_to_zero() {
        let html = page(r#"<li><h1>3日（今天）</h1><p class="wea">晴</p></li>"#);

        let record = &parse_short_range(&html).unwrap()[0];
        assert_eq!(record.high_temp(), "0");
        assert_eq!(record.low_temp(), "0");
    }

    #[test]
    fn test_missing_container_is_structural_error() {
        let html = r#"<html><body><div id="15d" class="c15d"></div></body></html>"#;
        let err = parse_short_range(html).unwrap_err();
        assert!(matches!(err, CnWeatherError::StructuralMismatch { .. }));
    }

    #[test]
    fn test_missing_list_is_structural_error() {
        let html = r#"<div id="7d" class="c7d"><ul class="other"><li>x</li></ul></div>"#;
        let err = parse_short_range(html).unwrap_err();
        assert!(err.to_string().contains("ul.t.clearfix"));
    }

    #[test]
    fn test_empty_list_is_structural_error() {
        let err = parse_short_range(&page("")).unwrap_err();
        assert!(matches!(err, CnWeatherError::StructuralMismatch { .. }));
    }
}
