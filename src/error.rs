use chrono::NaiveDate;
use thiserror::Error;

use crate::models::SourceId;

/// Failure of a single upstream request. No retries are attempted; a failed
/// request surfaces to the caller as-is.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

pub type SourceResult<T> = Result<T, UpstreamError>;

/// Errors of a full comparison run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Precondition failure; reported before any request is issued.
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// The requested indicator is outside the supported set.
    #[error("indicator {id} is not supported (expected one of {supported:?})")]
    UnsupportedIndicator {
        id: i64,
        supported: &'static [i64],
    },

    /// A mandatory source failed; the run aborts with nothing partial.
    #[error("{source} fetch failed: {error}")]
    Upstream {
        source: SourceId,
        #[source]
        error: UpstreamError,
    },

    /// The indicator/official join produced zero rows.
    #[error("no data for the selected period")]
    EmptyResult,
}
