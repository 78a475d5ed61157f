use async_trait::async_trait;
use reqwest::Client;

use crate::error::SourceResult;
use crate::models::{BlueQuote, Config, DateRange, Series, SourceId};
use crate::normalize::{daily_average, parse_day};

use super::{get_json, SeriesSource};

/// Market tag carried by parallel-rate entries in the evolution feed
const BLUE_SOURCE_TAG: &str = "Blue";

/// Client for the Bluelytics parallel-rate API
pub struct BluelyticsClient {
    client: Client,
    base_url: String,
}

impl BluelyticsClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.blue_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full rate history; the endpoint takes no date filter, so callers
    /// restrict to their range client-side.
    pub async fn get_evolution(&self) -> SourceResult<Vec<BlueQuote>> {
        let url = format!("{}/v2/evolution.json", self.base_url);
        get_json(&self.client, url, &[]).await
    }
}

/// Parallel-market ("blue") USD rate, the midpoint of buy and sell
pub struct BlueRateSource {
    client: BluelyticsClient,
}

impl BlueRateSource {
    pub fn new(client: BluelyticsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SeriesSource for BlueRateSource {
    type Raw = BlueQuote;

    fn id(&self) -> SourceId {
        SourceId::BlueRate
    }

    async fn fetch(&self, _range: &DateRange) -> SourceResult<Vec<BlueQuote>> {
        self.client.get_evolution().await
    }

    fn normalize(&self, records: Vec<BlueQuote>, range: &DateRange) -> Series {
        let points = records
            .into_iter()
            .filter(|quote| quote.source == BLUE_SOURCE_TAG)
            .filter_map(|quote| parse_day(&quote.date).map(|date| (date, quote)))
            .filter(|(date, _)| range.contains(*date))
            .map(|(date, quote)| (date, (quote.value_buy + quote.value_sell) / 2.0));

        Series::new(SourceId::BlueRate, daily_average(points))
    }
}
