use serde::{Deserialize, Serialize};

use crate::measurement::Source;

/// Counts collected for one input export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
    pub source: Option<Source>,
    /// Raw long-form records read from the file.
    pub records: usize,
    /// Records folded into another reading with the same key.
    pub duplicates_collapsed: usize,
    /// Rows after pivoting to wide form.
    pub wide_rows: usize,
    /// Distinct measurement columns after pivoting.
    pub columns: usize,
}

/// Stage-by-stage counts of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub vitals: SourceCounts,
    pub labs: SourceCounts,
    pub timeline_rows: usize,
    pub stays: usize,
    pub measurement_columns: usize,
    pub rows_meeting_threshold: usize,
    pub stays_meeting_threshold: usize,
    /// Absent per-stay aggregates before imputation.
    pub empty_aggregates: usize,
    pub imputed_cells: usize,
}
