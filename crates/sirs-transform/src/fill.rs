//! Last-value-carried-forward within each ICU stay.

use sirs_model::{StayKey, WideTable};

/// Forward-fill every measurement column within each
/// `(subject_id, hadm_id, icustay_id)` group.
///
/// Rows are visited in timeline order (the `BTreeMap` order of the table).
/// The carried values reset whenever the stay changes, so nothing crosses a
/// stay boundary and leading gaps stay absent.
pub fn forward_fill(table: &WideTable) -> WideTable {
    let width = table.width();
    let mut filled = WideTable::new(table.columns.clone());
    let mut current: Option<StayKey> = None;
    let mut last_seen: Vec<Option<f64>> = vec![None; width];

    for (key, values) in &table.rows {
        if current != Some(key.stay) {
            current = Some(key.stay);
            last_seen.iter_mut().for_each(|slot| *slot = None);
        }
        let row: Vec<Option<f64>> = values
            .iter()
            .zip(last_seen.iter_mut())
            .map(|(value, carried)| {
                if value.is_some() {
                    *carried = *value;
                }
                *carried
            })
            .collect();
        filled.rows.insert(*key, row);
    }
    filled
}
