//! Per-day grouping shared by every source normalizer.
//!
//! Each source reduces its raw records to (date, value) points; this module
//! collapses those points into one observation per calendar date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::models::DailyObservation;

/// Collapse (date, value) points into at most one observation per date,
/// averaging same-day duplicates. Output is ascending by date.
pub fn daily_average<I>(points: I) -> Vec<DailyObservation>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut buckets: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for (date, value) in points {
        let entry = buckets.entry(date).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(date, (sum, count))| DailyObservation {
            date,
            value: sum / count as f64,
        })
        .collect()
}

/// Parse a provider-supplied calendar date. Records with unparseable dates
/// are dropped from the series rather than failing the whole run.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            warn!("skipping record with unparseable date {:?}: {}", raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn averages_same_day_duplicates() {
        let observations = daily_average(vec![(day(2), 1100.5), (day(2), 1102.0)]);

        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].date, day(2));
        assert_eq!(observations[0].value, 1101.25);
    }

    #[test]
    fn output_is_sorted_and_has_no_duplicate_dates() {
        let observations = daily_average(vec![
            (day(9), 3.0),
            (day(2), 1.0),
            (day(9), 5.0),
            (day(5), 2.0),
        ]);

        let dates: Vec<NaiveDate> = observations.iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![day(2), day(5), day(9)]);
        assert_eq!(observations[2].value, 4.0);
    }

    #[test]
    fn single_point_passes_through() {
        let observations = daily_average(vec![(day(1), 42.0)]);
        assert_eq!(
            observations,
            vec![DailyObservation {
                date: day(1),
                value: 42.0
            }]
        );
    }

    #[test]
    fn empty_input_yields_empty_series() {
        assert!(daily_average(Vec::new()).is_empty());
    }

    #[test]
    fn parse_day_handles_iso_dates_only() {
        assert_eq!(
            parse_day("2024-03-15"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(parse_day("15/03/2024"), None);
        assert_eq!(parse_day(""), None);
    }
}
