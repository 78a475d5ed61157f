use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{SourceResult, UpstreamError};
use crate::models::{Config, DateRange, Series, SourceId};

pub mod bcra_client;
pub mod bluelytics_client;
pub use bcra_client::{BcraClient, IndicatorSource, OfficialRateSource};
pub use bluelytics_client::{BluelyticsClient, BlueRateSource};

/// The only monetary indicators exposed for comparison
pub const SUPPORTED_INDICATOR_IDS: [i64; 2] = [1, 15];

/// Build the HTTP client shared by all sources
pub fn build_http_client(config: &Config) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent("bcra-monitor/0.1")
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()?;

    Ok(client)
}

/// Issue a GET request and decode the JSON body, mapping transport, status
/// and decode failures onto `UpstreamError`
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: String,
    query: &[(&str, String)],
) -> SourceResult<T> {
    debug!("GET {}", url);

    let response = client
        .get(&url)
        .query(query)
        .send()
        .await
        .map_err(|e| UpstreamError::Transport {
            url: url.clone(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status { url, status });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| UpstreamError::Decode { url, source: e })
}

/// One upstream time-series feed. Each source knows how to fetch its raw
/// records for a date range and how to normalize them into a per-day series;
/// the rest of the pipeline only sees the normalized shape.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Raw record shape this source's provider returns
    type Raw: Send;

    fn id(&self) -> SourceId;

    /// Retrieve the raw records for the range. A non-success status or an
    /// unreachable provider surfaces immediately; no retries.
    async fn fetch(&self, range: &DateRange) -> SourceResult<Vec<Self::Raw>>;

    /// Reduce raw records to one observation per calendar date. A source with
    /// zero records in range yields an empty series, not an error.
    fn normalize(&self, records: Vec<Self::Raw>, range: &DateRange) -> Series;

    async fn fetch_series(&self, range: &DateRange) -> SourceResult<Series> {
        let records = self.fetch(range).await?;
        Ok(self.normalize(records, range))
    }
}
