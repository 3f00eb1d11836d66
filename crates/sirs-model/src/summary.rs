//! Per-stay summaries and the imputed cohort table.

use crate::ids::StayKey;

/// Aggregates for one ICU stay before imputation.
#[derive(Debug, Clone, PartialEq)]
pub struct StaySummary {
    pub stay: StayKey,
    /// Mean per measurement column; `None` when the stay has no value.
    pub means: Vec<Option<f64>>,
    pub max_sirs_count: u8,
    /// Number of timeline rows the stay contributed.
    pub row_count: usize,
}

/// One summary row per stay, ordered by stay key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CohortTable {
    /// Measurement column names (without the `mean` prefix).
    pub columns: Vec<String>,
    pub stays: Vec<StaySummary>,
}

impl CohortTable {
    /// Count of absent `(stay, column)` aggregates.
    pub fn absent_cells(&self) -> usize {
        self.stays
            .iter()
            .map(|stay| stay.means.iter().filter(|value| value.is_none()).count())
            .sum()
    }

    /// Stays whose worst row met the SIRS threshold.
    pub fn stays_meeting_threshold(&self) -> usize {
        self.stays
            .iter()
            .filter(|stay| stay.max_sirs_count >= crate::table::SIRS_THRESHOLD)
            .count()
    }
}

/// Fully populated stay row after imputation.
#[derive(Debug, Clone, PartialEq)]
pub struct ImputedStay {
    pub stay: StayKey,
    pub means: Vec<f64>,
    pub max_sirs_count: u8,
}

/// The final artifact: no absent numeric value remains.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImputedCohort {
    pub columns: Vec<String>,
    pub stays: Vec<ImputedStay>,
    /// How many cells were filled by the imputer.
    pub imputed_cells: usize,
}

/// Output column name for a measurement mean, e.g. `meanAlbumin`.
pub fn mean_column_name(column: &str) -> String {
    format!("mean{column}")
}

/// Output column name for the per-stay maximum criteria count.
pub const MAX_SIRS_COLUMN: &str = "maxSIRSCount";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_absent_cells_and_threshold_stays() {
        let table = CohortTable {
            columns: vec!["HeartRate".into(), "Albumin".into()],
            stays: vec![
                StaySummary {
                    stay: StayKey::new(1, 1, 1),
                    means: vec![Some(80.0), None],
                    max_sirs_count: 3,
                    row_count: 2,
                },
                StaySummary {
                    stay: StayKey::new(2, 2, 2),
                    means: vec![None, None],
                    max_sirs_count: 1,
                    row_count: 1,
                },
            ],
        };
        assert_eq!(table.absent_cells(), 3);
        assert_eq!(table.stays_meeting_threshold(), 1);
    }

    #[test]
    fn test_mean_column_names() {
        assert_eq!(mean_column_name("Albumin"), "meanAlbumin");
    }
}
