//! Duplicate collapsing and long-to-wide pivoting.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use sirs_model::{LongTable, MeasurementRecord, TimelineKey, WideTable, compare_columns};

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    present: usize,
}

/// Result of collapsing duplicate readings.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupeOutcome {
    /// One record per `(stay, charttime, column)`, in key order.
    pub records: Vec<MeasurementRecord>,
    /// Number of input records folded into another one.
    pub collapsed: usize,
}

/// Collapse readings that share `(subject_id, hadm_id, icustay_id, charttime,
/// measurement)` into their arithmetic mean.
///
/// Absent readings do not contribute to the mean; a group with no present
/// reading stays absent.
pub fn dedupe_readings(records: &[MeasurementRecord]) -> DedupeOutcome {
    let mut groups: BTreeMap<(TimelineKey, &str), Accumulator> = BTreeMap::new();
    for record in records {
        let entry = groups
            .entry((record.key, record.column.as_str()))
            .or_default();
        if let Some(value) = record.value {
            entry.sum += value;
            entry.present += 1;
        }
    }

    let collapsed = records.len() - groups.len();
    let records = groups
        .into_iter()
        .map(|((key, column), acc)| MeasurementRecord {
            key,
            column: column.to_string(),
            value: (acc.present > 0).then(|| acc.sum / acc.present as f64),
        })
        .collect();

    DedupeOutcome { records, collapsed }
}

/// Spread de-duplicated readings into one row per timeline key.
///
/// Columns are ordered with [`compare_columns`]. If the same
/// `(key, column)` occurs more than once the last reading wins, so callers
/// should pass the output of [`dedupe_readings`].
pub fn pivot(records: &[MeasurementRecord]) -> WideTable {
    let names: BTreeSet<&str> = records.iter().map(|r| r.column.as_str()).collect();
    let mut columns: Vec<String> = names.into_iter().map(str::to_string).collect();
    columns.sort_by(|a, b| compare_columns(a, b));

    let index: BTreeMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();

    let width = columns.len();
    let mut rows: BTreeMap<TimelineKey, Vec<Option<f64>>> = BTreeMap::new();
    for record in records {
        let values = rows.entry(record.key).or_insert_with(|| vec![None; width]);
        if let Some(&idx) = index.get(record.column.as_str()) {
            values[idx] = record.value;
        }
    }

    WideTable { columns, rows }
}

/// Wide table for one export plus what was collapsed on the way.
#[derive(Debug, Clone)]
pub struct PivotOutcome {
    pub table: WideTable,
    pub duplicates_collapsed: usize,
}

/// Average duplicate readings, then pivot the long table.
pub fn dedupe_and_pivot(long: &LongTable) -> PivotOutcome {
    let deduped = dedupe_readings(&long.records);
    if deduped.collapsed > 0 {
        debug!(
            source = %long.source,
            collapsed = deduped.collapsed,
            "averaged duplicate readings"
        );
    }
    PivotOutcome {
        table: pivot(&deduped.records),
        duplicates_collapsed: deduped.collapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sirs_model::{Source, StayKey};

    fn key(stay: i64, minute: u32) -> TimelineKey {
        TimelineKey::new(
            StayKey::new(1, 10, stay),
            Utc.with_ymd_and_hms(2101, 1, 1, 0, minute, 0).unwrap(),
        )
    }

    fn record(stay: i64, minute: u32, column: &str, value: Option<f64>) -> MeasurementRecord {
        MeasurementRecord {
            key: key(stay, minute),
            column: column.to_string(),
            value,
        }
    }

    #[test]
    fn test_duplicates_are_averaged() {
        let outcome = dedupe_readings(&[
            record(1, 0, "RespRate", Some(18.0)),
            record(1, 0, "RespRate", Some(22.0)),
        ]);
        assert_eq!(outcome.collapsed, 1);
        assert_eq!(outcome.records, vec![record(1, 0, "RespRate", Some(20.0))]);
    }

    #[test]
    fn test_absent_readings_do_not_dilute_the_mean() {
        let outcome = dedupe_readings(&[
            record(1, 0, "HeartRate", Some(90.0)),
            record(1, 0, "HeartRate", None),
        ]);
        assert_eq!(outcome.records[0].value, Some(90.0));

        let all_absent = dedupe_readings(&[record(1, 0, "HeartRate", None)]);
        assert_eq!(all_absent.records[0].value, None);
        assert_eq!(all_absent.collapsed, 0);
    }

    #[test]
    fn test_pivot_yields_one_row_per_timestamp() {
        let table = pivot(&[
            record(1, 0, "TempC", Some(37.0)),
            record(1, 0, "HeartRate", Some(80.0)),
            record(1, 5, "HeartRate", Some(85.0)),
        ]);
        assert_eq!(table.columns, vec!["HeartRate", "TempC"]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.rows[&key(1, 0)], vec![Some(80.0), Some(37.0)]);
        assert_eq!(table.rows[&key(1, 5)], vec![Some(85.0), None]);
    }

    #[test]
    fn test_absent_only_key_still_creates_a_row() {
        let table = pivot(&[record(2, 0, "TempC", None)]);
        assert_eq!(table.height(), 1);
        assert_eq!(table.rows[&key(2, 0)], vec![None]);
    }

    #[test]
    fn test_dedupe_and_pivot_reports_collapsed_count() {
        let long = LongTable::new(
            Source::Vitals,
            vec![
                record(1, 0, "HeartRate", Some(80.0)),
                record(1, 0, "HeartRate", Some(100.0)),
                record(1, 0, "HeartRate", Some(90.0)),
            ],
        );
        let outcome = dedupe_and_pivot(&long);
        assert_eq!(outcome.duplicates_collapsed, 2);
        assert_eq!(outcome.table.rows[&key(1, 0)], vec![Some(90.0)]);
    }
}
