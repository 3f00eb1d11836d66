//! Full outer join of two wide tables on the timeline key.

use std::collections::{BTreeSet, HashSet};

use sirs_model::{Source, TimelineKey, WideTable, compare_columns};

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Join two wide tables on `(subject_id, hadm_id, icustay_id, charttime)`.
///
/// Every key present on either side appears exactly once. Columns from the
/// side a row did not come from are absent, never zero. A column name present
/// on both sides is kept twice, suffixed with the source tag
/// (`Glucose_vitals`, `Glucose_labs`).
pub fn outer_join(
    left: &WideTable,
    left_source: Source,
    right: &WideTable,
    right_source: Source,
) -> WideTable {
    let left_names: HashSet<&str> = left.columns.iter().map(String::as_str).collect();
    let right_names: HashSet<&str> = right.columns.iter().map(String::as_str).collect();

    let mut slots: Vec<(String, Side, usize)> = Vec::with_capacity(left.width() + right.width());
    for (idx, name) in left.columns.iter().enumerate() {
        let merged = if right_names.contains(name.as_str()) {
            format!("{name}_{}", left_source.tag())
        } else {
            name.clone()
        };
        slots.push((merged, Side::Left, idx));
    }
    for (idx, name) in right.columns.iter().enumerate() {
        let merged = if left_names.contains(name.as_str()) {
            format!("{name}_{}", right_source.tag())
        } else {
            name.clone()
        };
        slots.push((merged, Side::Right, idx));
    }
    slots.sort_by(|a, b| compare_columns(&a.0, &b.0));

    let keys: BTreeSet<TimelineKey> = left.rows.keys().chain(right.rows.keys()).copied().collect();

    let mut merged = WideTable::new(slots.iter().map(|(name, _, _)| name.clone()).collect());
    for key in keys {
        let left_row = left.rows.get(&key);
        let right_row = right.rows.get(&key);
        let values = slots
            .iter()
            .map(|(_, side, idx)| match side {
                Side::Left => left_row.and_then(|row| row[*idx]),
                Side::Right => right_row.and_then(|row| row[*idx]),
            })
            .collect();
        merged.rows.insert(key, values);
    }
    merged
}
