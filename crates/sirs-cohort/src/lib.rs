//! Per-stay cohort construction.
//!
//! - [`summarize_stays`]: means and maximum criteria count per ICU stay
//! - [`impute`]: KNN imputation of the absent means
//! - [`build_cohort`]: fit once, fill everything
//! - [`cohort_frame`] / [`timeline_frame`]: polars frames for CSV output

mod aggregate;
mod cohort;
pub mod error;
mod frame;
pub mod impute;

pub use aggregate::summarize_stays;
pub use cohort::{build_cohort, feature_matrix};
pub use error::{CohortError, ImputeError, Result};
pub use frame::{
    CHARTTIME, HADM_ID, ICUSTAY_ID, SIRS_COUNT, SIRS_MET, SUBJECT_ID, cohort_frame,
    timeline_frame, write_csv,
};
pub use impute::{FeatureMatrix, FilledMatrix, FittedImputer, Imputer, KnnImputer, Weighting};
