//! Wide, per-timestamp tables.

use std::collections::BTreeMap;

use crate::ids::{StayKey, TimelineKey};

/// One row per `(subject_id, hadm_id, icustay_id, charttime)` with one
/// optional value per measurement column.
///
/// Rows are held in a `BTreeMap`, so iteration is always in timeline order.
/// `None` means "no reading", which is never conflated with zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    pub columns: Vec<String>,
    pub rows: BTreeMap<TimelineKey, Vec<Option<f64>>>,
}

impl WideTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: BTreeMap::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Value at `(key, column)`; `None` for a missing row, column or reading.
    pub fn value(&self, key: &TimelineKey, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.rows.get(key).and_then(|values| values[idx])
    }

    /// Number of distinct stays present in the table.
    pub fn stay_count(&self) -> usize {
        let mut count = 0usize;
        let mut last: Option<StayKey> = None;
        for key in self.rows.keys() {
            if last != Some(key.stay) {
                count += 1;
                last = Some(key.stay);
            }
        }
        count
    }
}

/// SIRS criteria evaluated for one timeline row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SirsFlags {
    /// Temperature above or below the normal band.
    pub temperature: bool,
    /// Tachycardia.
    pub heart_rate: bool,
    /// Tachypnoea or hypocapnia.
    pub respiratory: bool,
    /// Leukocytosis, leukopenia or bandemia.
    pub white_cells: bool,
}

impl SirsFlags {
    pub fn count(self) -> u8 {
        [
            self.temperature,
            self.heart_rate,
            self.respiratory,
            self.white_cells,
        ]
        .into_iter()
        .map(u8::from)
        .sum()
    }

    pub fn meets_threshold(self) -> bool {
        self.count() >= SIRS_THRESHOLD
    }
}

/// Minimum number of satisfied criteria for a row to meet SIRS.
pub const SIRS_THRESHOLD: u8 = 2;

/// Forward-filled timeline with SIRS flags per row.
///
/// `flags` is aligned with the iteration order of `table.rows`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotatedTimeline {
    pub table: WideTable,
    pub flags: Vec<SirsFlags>,
}

impl AnnotatedTimeline {
    pub fn iter(&self) -> impl Iterator<Item = (&TimelineKey, &Vec<Option<f64>>, SirsFlags)> {
        self.table
            .rows
            .iter()
            .zip(self.flags.iter().copied())
            .map(|((key, values), flags)| (key, values, flags))
    }

    pub fn rows_meeting_threshold(&self) -> usize {
        self.flags.iter().filter(|flags| flags.meets_threshold()).count()
    }
}
