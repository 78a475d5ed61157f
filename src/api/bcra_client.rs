use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{PipelineError, SourceResult};
use crate::models::{
    BcraResponse, Config, DateRange, IndicatorInfo, IndicatorPoint, QuotationDay, Series, SourceId,
};
use crate::normalize::{daily_average, parse_day};

use super::{get_json, SeriesSource, SUPPORTED_INDICATOR_IDS};

/// Client for the BCRA statistics APIs (monetary series and exchange rates)
pub struct BcraClient {
    client: Client,
    base_url: String,
    indicator_fetch_limit: u32,
    official_fetch_limit: u32,
}

impl BcraClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.bcra_base_url.trim_end_matches('/').to_string(),
            indicator_fetch_limit: config.indicator_fetch_limit,
            official_fetch_limit: config.official_fetch_limit,
        }
    }

    /// Catalog of monetary series, restricted to the supported ids and
    /// sorted by description for display.
    pub async fn get_indicator_catalog(&self) -> SourceResult<Vec<IndicatorInfo>> {
        let url = format!("{}/estadisticas/v3.0/monetarias", self.base_url);
        let response: BcraResponse<IndicatorInfo> = get_json(&self.client, url, &[]).await?;

        let mut catalog: Vec<IndicatorInfo> = response
            .results
            .into_iter()
            .filter(|info| SUPPORTED_INDICATOR_IDS.contains(&info.id))
            .collect();
        catalog.sort_by(|a, b| a.description.cmp(&b.description));

        debug!("catalog has {} supported indicators", catalog.len());
        Ok(catalog)
    }

    /// Daily values of one monetary series restricted to the range
    pub async fn get_indicator_series(
        &self,
        indicator_id: i64,
        range: &DateRange,
    ) -> SourceResult<Vec<IndicatorPoint>> {
        let url = format!("{}/estadisticas/v3.0/monetarias/{}", self.base_url, indicator_id);
        let query = [
            ("desde", range.start.format("%Y-%m-%d").to_string()),
            ("hasta", range.end.format("%Y-%m-%d").to_string()),
            ("limit", self.indicator_fetch_limit.to_string()),
        ];

        let response: BcraResponse<IndicatorPoint> = get_json(&self.client, url, &query).await?;
        Ok(response.results)
    }

    /// Official USD quotations restricted to the range; a day may carry
    /// several quotation entries.
    pub async fn get_usd_quotations(&self, range: &DateRange) -> SourceResult<Vec<QuotationDay>> {
        let url = format!(
            "{}/estadisticascambiarias/v1.0/Cotizaciones/USD",
            self.base_url
        );
        let query = [
            ("fechadesde", range.start.format("%Y-%m-%d").to_string()),
            ("fechahasta", range.end.format("%Y-%m-%d").to_string()),
            ("limit", self.official_fetch_limit.to_string()),
        ];

        let response: BcraResponse<QuotationDay> = get_json(&self.client, url, &query).await?;
        Ok(response.results)
    }
}

/// Monetary-indicator series selected by id from the supported set
pub struct IndicatorSource {
    client: Arc<BcraClient>,
    indicator_id: i64,
}

impl IndicatorSource {
    /// Rejects ids outside the supported set before any request is made.
    pub fn new(client: Arc<BcraClient>, indicator_id: i64) -> Result<Self, PipelineError> {
        if !SUPPORTED_INDICATOR_IDS.contains(&indicator_id) {
            return Err(PipelineError::UnsupportedIndicator {
                id: indicator_id,
                supported: &SUPPORTED_INDICATOR_IDS,
            });
        }
        Ok(Self {
            client,
            indicator_id,
        })
    }
}

#[async_trait]
impl SeriesSource for IndicatorSource {
    type Raw = IndicatorPoint;

    fn id(&self) -> SourceId {
        SourceId::Indicator
    }

    async fn fetch(&self, range: &DateRange) -> SourceResult<Vec<IndicatorPoint>> {
        self.client
            .get_indicator_series(self.indicator_id, range)
            .await
    }

    fn normalize(&self, records: Vec<IndicatorPoint>, _range: &DateRange) -> Series {
        // Already one value per day; the grouping step still guards against
        // a feed that repeats a date.
        let points = records
            .into_iter()
            .filter_map(|point| parse_day(&point.date).map(|date| (date, point.value)));

        Series::new(SourceId::Indicator, daily_average(points))
    }
}

/// Central-bank official USD rate, averaged over each day's quotations
pub struct OfficialRateSource {
    client: Arc<BcraClient>,
}

impl OfficialRateSource {
    pub fn new(client: Arc<BcraClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SeriesSource for OfficialRateSource {
    type Raw = QuotationDay;

    fn id(&self) -> SourceId {
        SourceId::OfficialRate
    }

    async fn fetch(&self, range: &DateRange) -> SourceResult<Vec<QuotationDay>> {
        self.client.get_usd_quotations(range).await
    }

    fn normalize(&self, records: Vec<QuotationDay>, _range: &DateRange) -> Series {
        let mut discarded = 0usize;
        let mut points = Vec::new();

        for day in records {
            let date = match parse_day(&day.date) {
                Some(date) => date,
                None => continue,
            };
            for quotation in day.detail {
                match quotation.rate.as_f64() {
                    Some(value) => points.push((date, value)),
                    None => discarded += 1,
                }
            }
        }

        if discarded > 0 {
            debug!(
                "discarded {} non-numeric quotation entries from the official feed",
                discarded
            );
        }

        Series::new(SourceId::OfficialRate, daily_average(points))
    }
}
