//! Missing-value imputation behind a fit/fill contract.
//!
//! An [`Imputer`] is fitted once over the whole cohort and the resulting
//! model fills every absent cell of a matrix with the same width.

mod knn;
mod matrix;

pub use knn::{KnnImputer, KnnModel, Weighting, nan_euclidean};
pub use matrix::{FeatureMatrix, FilledMatrix};

use crate::error::ImputeError;

pub trait Imputer {
    type Model: FittedImputer;

    fn fit(&self, matrix: &FeatureMatrix) -> Result<Self::Model, ImputeError>;
}

pub trait FittedImputer {
    fn fill(&self, matrix: &FeatureMatrix) -> Result<FilledMatrix, ImputeError>;
}
