//! Forecast normalizer
//!
//! Fetches the 7-day and 15-day pages of weather.com.cn for a region code and
//! turns both layouts into one ordered list of [`ForecastRecord`]s:
//! - `short_range`: structural scraping of the 7-day page (days 1-7)
//! - `extended_range`: positional scraping of the 15-day page (days 8-15)
//! - `normalize`: date and temperature clean-up shared by both
//! - `source`: the transport seam, reqwest in production
//!
//! Only [`ForecastNormalizer::fetch`] is meant to be called by the rest of the
//! application.

pub mod extended_range;
pub mod normalize;
pub mod short_range;
pub mod source;

pub use extended_range::{EXTENDED_ENTRY_LIMIT, parse_extended_entries, parse_extended_range};
pub use short_range::parse_short_range;
pub use source::{HttpPageSource, PageSource};

use crate::config::SourceConfig;
use crate::models::ForecastRecord;
use crate::{CnWeatherError, Result};
use scraper::Selector;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| CnWeatherError::structural(format!("invalid selector '{css}': {e}")))
}

/// Fetches and normalizes forecasts for one region code at a time
pub struct ForecastNormalizer<S = HttpPageSource> {
    source: S,
    short_range_url: String,
    extended_range_url: String,
}

impl ForecastNormalizer<HttpPageSource> {
    /// Create a normalizer that reads pages over HTTP
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Ok(Self::with_source(HttpPageSource::new(config)?, config))
    }
}

impl<S: PageSource> ForecastNormalizer<S> {
    /// Create a normalizer on top of any page source
    pub fn with_source(source: S, config: &SourceConfig) -> Self {
        Self {
            source,
            short_range_url: config.short_range_url.clone(),
            extended_range_url: config.extended_range_url.clone(),
        }
    }

    /// Fetch the merged forecast for a region
    ///
    /// Fails when the 7-day page cannot be read or parsed. A failing 15-day
    /// page only shortens the result to the 7-day records.
    #[instrument(skip(self))]
    pub fn fetch(&self, region_code: &str) -> Result<Vec<ForecastRecord>> {
        let start_time = Instant::now();

        let mut records = self.fetch_short_range(region_code)?;
        let short_range_count = records.len();

        match self.fetch_extended_entries(region_code) {
            Ok(extended) => {
                let mut seen: HashSet<String> =
                    records.iter().map(|r| r.date().to_string()).collect();
                // drop repeated dates before applying the limit
                let fresh: Vec<ForecastRecord> = extended
                    .into_iter()
                    .filter(|record| {
                        let new = seen.insert(record.date().to_string());
                        if !new {
                            debug!("Dropping extended record duplicating {}", record.date());
                        }
                        new
                    })
                    .take(EXTENDED_ENTRY_LIMIT)
                    .collect();
                records.extend(fresh);
            }
            Err(e) => {
                warn!(
                    "15-day forecast unavailable for {}, using 7-day forecast only: {}",
                    region_code, e
                );
            }
        }

        info!(
            "Forecast for {}: {} records ({} short-range) in {:.3}s",
            region_code,
            records.len(),
            short_range_count,
            start_time.elapsed().as_secs_f64()
        );

        Ok(records)
    }

    /// Fetch and parse the 7-day page
    pub fn fetch_short_range(&self, region_code: &str) -> Result<Vec<ForecastRecord>> {
        let html = self.read_page(&self.short_range_url, region_code)?;
        parse_short_range(&html).inspect_err(|e| {
            error!("Failed to parse 7-day forecast for {}: {}", region_code, e);
        })
    }

    /// Fetch and parse the 15-day page
    pub fn fetch_extended_range(&self, region_code: &str) -> Result<Vec<ForecastRecord>> {
        let html = self.read_page(&self.extended_range_url, region_code)?;
        parse_extended_range(&html).inspect_err(|e| {
            error!("Failed to parse 15-day forecast for {}: {}", region_code, e);
        })
    }

    fn fetch_extended_entries(&self, region_code: &str) -> Result<Vec<ForecastRecord>> {
        let html = self.read_page(&self.extended_range_url, region_code)?;
        parse_extended_entries(&html).inspect_err(|e| {
            error!("Failed to parse 15-day forecast for {}: {}", region_code, e);
        })
    }

    fn read_page(&self, template: &str, region_code: &str) -> Result<String> {
        let region_code = region_code.trim();
        if region_code.is_empty() {
            error!("Refusing to fetch a forecast for an empty region code");
            return Err(CnWeatherError::validation("region code cannot be empty"));
        }

        let url = SourceConfig::url_for(template, region_code);
        debug!("Fetching {}", url);

        self.source.get(&url).inspect_err(|e| {
            error!("Failed to fetch {}: {}", url, e);
        })
    }
}
