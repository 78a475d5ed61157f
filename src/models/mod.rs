use std::fmt;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::PipelineError;

/// Identifies which upstream feed a series came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Indicator,
    OfficialRate,
    BlueRate,
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceId::Indicator => "monetary indicator",
            SourceId::OfficialRate => "official USD rate",
            SourceId::BlueRate => "blue USD rate",
        };
        write!(f, "{}", name)
    }
}

/// One normalized (date, value) pair for a source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Normalized per-day series for one source.
/// Observations are ascending by date with at most one entry per date.
#[derive(Debug, Clone)]
pub struct Series {
    pub source: SourceId,
    pub observations: Vec<DailyObservation>,
}

impl Series {
    pub fn new(source: SourceId, observations: Vec<DailyObservation>) -> Self {
        Self {
            source,
            observations,
        }
    }

    pub fn empty(source: SourceId) -> Self {
        Self::new(source, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// One row of the reconciled output table
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    pub date: NaiveDate,
    pub indicator_value: f64,
    pub official_rate: f64,
    pub blue_rate: Option<f64>,
}

/// Inclusive date range for a comparison run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting ranges whose start falls after their end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PipelineError> {
        if start > end {
            return Err(PipelineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// One entry of the BCRA monetary-series catalog
#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorInfo {
    #[serde(rename = "idVariable")]
    pub id: i64,
    #[serde(rename = "descripcion")]
    pub description: String,
}

/// Envelope the BCRA statistics APIs wrap every payload in
#[derive(Debug, Deserialize)]
pub struct BcraResponse<T> {
    pub results: Vec<T>,
}

/// One daily point of a monetary series
#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorPoint {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "valor")]
    pub value: f64,
}

/// One day of the official exchange-rate feed; a day may carry several quotations
#[derive(Debug, Clone, Deserialize)]
pub struct QuotationDay {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "detalle", default)]
    pub detail: Vec<QuotationDetail>,
}

/// A single quotation entry. The feed reports placeholder (null or string)
/// quotations on non-trading entries, so the value is kept as raw JSON and
/// filtered to numbers during normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotationDetail {
    #[serde(rename = "tipoCotizacion", default)]
    pub rate: serde_json::Value,
}

/// One entry of the Bluelytics evolution feed
#[derive(Debug, Clone, Deserialize)]
pub struct BlueQuote {
    pub date: String,
    pub source: String,
    pub value_buy: f64,
    pub value_sell: f64,
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub bcra_base_url: String,
    pub blue_base_url: String,
    pub request_timeout_secs: u64,
    pub indicator_fetch_limit: u32,
    pub official_fetch_limit: u32,
    /// The BCRA host serves an incomplete certificate chain; verification
    /// can be disabled for it, matching the upstream default.
    pub accept_invalid_certs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bcra_base_url: "https://api.bcra.gob.ar".to_string(),
            blue_base_url: "https://api.bluelytics.com.ar".to_string(),
            request_timeout_secs: 30,
            indicator_fetch_limit: 3000,
            official_fetch_limit: 1000,
            accept_invalid_certs: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let defaults = Config::default();

        Ok(Config {
            bcra_base_url: std::env::var("BCRA_BASE_URL").unwrap_or(defaults.bcra_base_url),
            blue_base_url: std::env::var("BLUELYTICS_BASE_URL").unwrap_or(defaults.blue_base_url),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            indicator_fetch_limit: std::env::var("INDICATOR_FETCH_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.indicator_fetch_limit),
            official_fetch_limit: std::env::var("OFFICIAL_FETCH_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.official_fetch_limit),
            accept_invalid_certs: std::env::var("BCRA_ACCEPT_INVALID_CERTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.accept_invalid_certs),
        })
    }
}
