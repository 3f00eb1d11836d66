//! Imputed cohort assembly.

use tracing::debug;

use sirs_model::{
    CohortTable, ImputedCohort, ImputedStay, MAX_SIRS_COLUMN, mean_column_name,
};

use crate::error::{ImputeError, Result};
use crate::impute::{FeatureMatrix, FittedImputer, Imputer};

/// Feature matrix of a cohort: one `mean<Column>` per measurement followed by
/// `maxSIRSCount`. Identifiers are not features.
pub fn feature_matrix(cohort: &CohortTable) -> FeatureMatrix {
    let mut columns: Vec<String> = cohort
        .columns
        .iter()
        .map(|column| mean_column_name(column))
        .collect();
    columns.push(MAX_SIRS_COLUMN.to_string());

    let mut matrix = FeatureMatrix::new(columns);
    for stay in &cohort.stays {
        let mut row = stay.means.clone();
        row.push(Some(f64::from(stay.max_sirs_count)));
        matrix.push_row(row);
    }
    matrix
}

/// Fit `imputer` once over the whole cohort and fill every absent mean.
pub fn build_cohort<I: Imputer>(cohort: &CohortTable, imputer: &I) -> Result<ImputedCohort> {
    let matrix = feature_matrix(cohort);
    let model = imputer.fit(&matrix)?;
    let filled = model.fill(&matrix)?;
    if filled.rows.len() != cohort.stays.len() {
        return Err(ImputeError::RowMismatch {
            expected: cohort.stays.len(),
            found: filled.rows.len(),
        }
        .into());
    }

    let width = cohort.columns.len();
    let stays = cohort
        .stays
        .iter()
        .zip(filled.rows)
        .map(|(summary, mut row)| {
            row.truncate(width);
            ImputedStay {
                stay: summary.stay,
                means: row,
                max_sirs_count: summary.max_sirs_count,
            }
        })
        .collect();

    debug!(
        stays = cohort.stays.len(),
        imputed_cells = filled.imputed_cells,
        "filled cohort aggregates"
    );
    Ok(ImputedCohort {
        columns: cohort.columns.clone(),
        stays,
        imputed_cells: filled.imputed_cells,
    })
}
