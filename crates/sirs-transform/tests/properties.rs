//! Property tests for the reshaping stages.

use std::collections::BTreeMap;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use sirs_model::{MeasurementRecord, Source, StayKey, TimelineKey, WideTable};
use sirs_transform::{dedupe_readings, forward_fill, outer_join, pivot};

const COLUMNS: [&str; 3] = ["HeartRate", "TempC", "WBC"];

fn timeline_key(stay: i64, minute: i64) -> TimelineKey {
    let base = Utc.with_ymd_and_hms(2101, 1, 1, 0, 0, 0).unwrap();
    TimelineKey::new(StayKey::new(stay, stay * 10, stay * 100), base + Duration::minutes(minute))
}

fn record_strategy() -> impl Strategy<Value = MeasurementRecord> {
    (
        1i64..4,
        0i64..6,
        0usize..COLUMNS.len(),
        proptest::option::weighted(0.8, 0.0f64..200.0),
    )
        .prop_map(|(stay, minute, column, value)| MeasurementRecord {
            key: timeline_key(stay, minute),
            column: COLUMNS[column].to_string(),
            value,
        })
}

fn wide_strategy(columns: &'static [&'static str]) -> impl Strategy<Value = WideTable> {
    proptest::collection::vec(
        (
            1i64..4,
            0i64..8,
            proptest::collection::vec(
                proptest::option::weighted(0.5, 0.0f64..200.0),
                columns.len(),
            ),
        ),
        0..24,
    )
    .prop_map(move |rows| {
        let mut table = WideTable::new(columns.iter().map(|c| (*c).to_string()).collect());
        for (stay, minute, values) in rows {
            table.rows.insert(timeline_key(stay, minute), values);
        }
        table
    })
}

proptest! {
    #[test]
    fn test_dedupe_leaves_unique_keys_holding_the_present_mean(
        records in proptest::collection::vec(record_strategy(), 0..60)
    ) {
        let outcome = dedupe_readings(&records);

        let mut expected: BTreeMap<(TimelineKey, String), Vec<f64>> = BTreeMap::new();
        for record in &records {
            let entry = expected.entry((record.key, record.column.clone())).or_default();
            if let Some(value) = record.value {
                entry.push(value);
            }
        }

        prop_assert_eq!(outcome.records.len(), expected.len());
        prop_assert_eq!(outcome.collapsed, records.len() - expected.len());
        for record in &outcome.records {
            let values = &expected[&(record.key, record.column.clone())];
            if values.is_empty() {
                prop_assert!(record.value.is_none());
            } else {
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                let got = record.value.unwrap_or(f64::NAN);
                prop_assert!((got - mean).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_pivot_has_one_row_per_distinct_key(
        records in proptest::collection::vec(record_strategy(), 0..60)
    ) {
        let deduped = dedupe_readings(&records);
        let table = pivot(&deduped.records);
        let mut keys: Vec<TimelineKey> = records.iter().map(|r| r.key).collect();
        keys.sort();
        keys.dedup();
        prop_assert_eq!(table.rows.keys().copied().collect::<Vec<_>>(), keys);
    }

    #[test]
    fn test_outer_join_keeps_every_key(
        left in wide_strategy(&["HeartRate", "Glucose"]),
        right in wide_strategy(&["WBC", "Glucose"]),
    ) {
        let merged = outer_join(&left, Source::Vitals, &right, Source::Labs);

        prop_assert_eq!(merged.width(), 4);
        for (key, values) in &left.rows {
            prop_assert!(merged.rows.contains_key(key));
            prop_assert_eq!(merged.value(key, "HeartRate"), values[0]);
            prop_assert_eq!(merged.value(key, "Glucose_vitals"), values[1]);
        }
        for (key, values) in &right.rows {
            prop_assert!(merged.rows.contains_key(key));
            prop_assert_eq!(merged.value(key, "WBC"), values[0]);
            prop_assert_eq!(merged.value(key, "Glucose_labs"), values[1]);
        }
        for key in merged.rows.keys() {
            prop_assert!(left.rows.contains_key(key) || right.rows.contains_key(key));
        }
    }

    #[test]
    fn test_forward_fill_only_uses_earlier_values_of_the_same_stay(
        table in wide_strategy(&["HeartRate", "TempC"])
    ) {
        let filled = forward_fill(&table);
        prop_assert_eq!(filled.height(), table.height());

        for (key, values) in &filled.rows {
            for (idx, value) in values.iter().enumerate() {
                let expected = table
                    .rows
                    .range(..=*key)
                    .rev()
                    .take_while(|(earlier, _)| earlier.stay == key.stay)
                    .find_map(|(_, row)| row[idx]);
                prop_assert_eq!(*value, expected);
            }
        }
    }
}
