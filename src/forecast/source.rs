//! Page transport for the forecast normalizer

use crate::config::SourceConfig;
use crate::{CnWeatherError, Result};
use reqwest::blocking::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument};

/// Reads one document by URL
///
/// Implementations perform exactly one read per call and report a
/// non-success response as [`CnWeatherError::UnexpectedStatus`].
pub trait PageSource {
    fn get(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP page source backed by reqwest
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    /// Build a client with the configured timeout and User-Agent
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| {
                CnWeatherError::config(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    #[instrument(skip(self))]
    fn get(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();

        let response = self.client.get(url).send().map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            CnWeatherError::from(e)
        })?;

        let status = response.status();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            error!("Fetching {} failed: HTTP {}", url, status.as_u16());
            return Err(CnWeatherError::unexpected_status(status.as_u16(), url));
        }

        // The site does not always declare its charset; always read UTF-8.
        let bytes = response.bytes().map_err(|e| {
            error!("Reading body of {} failed: {}", url, e);
            CnWeatherError::from(e)
        })?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        info!(
            "Fetched {} ({} bytes) in {:.3}s",
            url,
            body.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(body)
    }
}
