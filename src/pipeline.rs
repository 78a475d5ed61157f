//! Comparison pipeline: validation gate, concurrent fetch of the three
//! sources, and the date-aligned join.

use chrono::NaiveDate;
use futures::join;
use tracing::{info, warn};

use crate::api::SeriesSource;
use crate::error::PipelineError;
use crate::join::join_series;
use crate::models::{CombinedRow, DateRange, Series};

/// Run one comparison: fetch and normalize the indicator, official-rate and
/// blue-rate series for the range, then join them into the combined table.
///
/// The date range is validated before any request is issued. The indicator
/// and official-rate sources are mandatory; if either fails the run aborts
/// with nothing partial. The blue-rate source is optional: a failed fetch or
/// an empty result is logged and the comparison proceeds without it.
pub async fn run_comparison<I, O, B>(
    indicator: &I,
    official: &O,
    blue: &B,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<CombinedRow>, PipelineError>
where
    I: SeriesSource,
    O: SeriesSource,
    B: SeriesSource,
{
    let range = DateRange::new(start, end)?;
    info!("fetching series for {} to {}", range.start, range.end);

    // Independent fetches, issued concurrently
    let (indicator_result, official_result, blue_result) = join!(
        indicator.fetch_series(&range),
        official.fetch_series(&range),
        blue.fetch_series(&range),
    );

    let indicator_series = indicator_result.map_err(|error| PipelineError::Upstream {
        source: indicator.id(),
        error,
    })?;
    let official_series = official_result.map_err(|error| PipelineError::Upstream {
        source: official.id(),
        error,
    })?;

    let blue_series = match blue_result {
        Ok(series) => {
            if series.is_empty() {
                warn!("{} has no observations in range, continuing without it", blue.id());
            }
            series
        }
        Err(error) => {
            warn!("{} fetch failed, continuing without it: {}", blue.id(), error);
            Series::empty(blue.id())
        }
    };

    info!(
        "normalized series sizes: indicator={}, official={}, blue={}",
        indicator_series.len(),
        official_series.len(),
        blue_series.len()
    );

    join_series(&indicator_series, &official_series, &blue_series)
}
