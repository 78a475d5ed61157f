//! Date-aligned join of the normalized series into the combined table.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::PipelineError;
use crate::models::{CombinedRow, Series};

/// Inner-join the indicator and official series on date, attaching the blue
/// rate wherever it has an observation for the same date. A date appears in
/// the output iff both mandatory series observed it; rows are ascending by
/// date. Fails with `EmptyResult` when the mandatory join has no rows.
pub fn join_series(
    indicator: &Series,
    official: &Series,
    blue: &Series,
) -> Result<Vec<CombinedRow>, PipelineError> {
    let official_by_date: BTreeMap<NaiveDate, f64> = official
        .observations
        .iter()
        .map(|o| (o.date, o.value))
        .collect();
    let blue_by_date: BTreeMap<NaiveDate, f64> = blue
        .observations
        .iter()
        .map(|o| (o.date, o.value))
        .collect();

    let rows: Vec<CombinedRow> = indicator
        .observations
        .iter()
        .filter_map(|obs| {
            official_by_date.get(&obs.date).map(|&official_rate| CombinedRow {
                date: obs.date,
                indicator_value: obs.value,
                official_rate,
                blue_rate: blue_by_date.get(&obs.date).copied(),
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(PipelineError::EmptyResult);
    }

    Ok(rows)
}
