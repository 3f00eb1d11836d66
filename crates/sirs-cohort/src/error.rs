//! Error types for cohort building.

use std::path::PathBuf;
use thiserror::Error;

use sirs_model::StayKey;

/// Failures of the KNN imputer. All of them abort the run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImputeError {
    /// A feature column has no present value in the whole cohort.
    #[error("feature column '{column}' has no values in any stay; nothing to impute from")]
    EmptyFeature { column: String },

    #[error("neighbour count must be at least 1, got {0}")]
    InvalidNeighbors(usize),

    /// The matrix being filled does not have the fitted width.
    #[error("feature matrix has {found} columns, imputer was fitted on {expected}")]
    ShapeMismatch { expected: usize, found: usize },

    /// The filled matrix does not have one row per stay.
    #[error("imputer returned {found} rows for {expected} stays")]
    RowMismatch { expected: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum CohortError {
    #[error("imputation failed: {0}")]
    Impute(#[from] ImputeError),

    /// One `icustay_id` appears under two admissions or patients.
    #[error("icustay_id {icustay_id} is recorded under two admissions: ({first}) and ({second})")]
    ConflictingStay {
        icustay_id: i64,
        first: StayKey,
        second: StayKey,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<polars::prelude::PolarsError> for CohortError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CohortError>;
