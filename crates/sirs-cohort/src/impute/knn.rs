//! K-nearest-neighbour imputation over a NaN-aware euclidean distance.

use tracing::debug;

use super::matrix::{FeatureMatrix, FilledMatrix};
use super::{FittedImputer, Imputer};
use crate::error::ImputeError;

/// How the values of the selected donors are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Weighting {
    #[default]
    Uniform,
    /// Inverse distance; donors at distance zero share all the weight.
    Distance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnnImputer {
    pub neighbors: usize,
    pub weighting: Weighting,
}

impl Default for KnnImputer {
    fn default() -> Self {
        Self {
            neighbors: 5,
            weighting: Weighting::Uniform,
        }
    }
}

impl KnnImputer {
    pub fn new(neighbors: usize) -> Self {
        Self {
            neighbors,
            ..Self::default()
        }
    }

    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }
}

impl Imputer for KnnImputer {
    type Model = KnnModel;

    fn fit(&self, matrix: &FeatureMatrix) -> Result<KnnModel, ImputeError> {
        if self.neighbors == 0 {
            return Err(ImputeError::InvalidNeighbors(self.neighbors));
        }
        let mut means = Vec::with_capacity(matrix.width());
        for (idx, column) in matrix.columns.iter().enumerate() {
            match matrix.column_mean(idx) {
                Some(mean) => means.push(mean),
                None if matrix.height() == 0 => means.push(0.0),
                None => {
                    return Err(ImputeError::EmptyFeature {
                        column: column.clone(),
                    });
                }
            }
        }
        debug!(
            rows = matrix.height(),
            columns = matrix.width(),
            neighbors = self.neighbors,
            "fitted knn imputer"
        );
        Ok(KnnModel {
            neighbors: self.neighbors,
            weighting: self.weighting,
            donors: matrix.rows.clone(),
            means,
        })
    }
}

/// Fitted donors plus per-column fallback means.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnModel {
    neighbors: usize,
    weighting: Weighting,
    donors: Vec<Vec<Option<f64>>>,
    means: Vec<f64>,
}

impl KnnModel {
    pub fn width(&self) -> usize {
        self.means.len()
    }

    fn impute_cell(&self, row: &[Option<f64>], column: usize) -> f64 {
        let mut candidates: Vec<(f64, usize, f64)> = self
            .donors
            .iter()
            .enumerate()
            .filter_map(|(position, donor)| {
                let value = donor[column]?;
                let distance = nan_euclidean(row, donor)?;
                Some((distance, position, value))
            })
            .collect();
        if candidates.is_empty() {
            return self.means[column];
        }
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        candidates.truncate(self.neighbors);
        combine(&candidates, self.weighting)
    }
}

impl FittedImputer for KnnModel {
    fn fill(&self, matrix: &FeatureMatrix) -> Result<FilledMatrix, ImputeError> {
        if matrix.width() != self.width() {
            return Err(ImputeError::ShapeMismatch {
                expected: self.width(),
                found: matrix.width(),
            });
        }
        let mut imputed_cells = 0;
        let rows = matrix
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(column, cell)| match cell {
                        Some(value) => *value,
                        None => {
                            imputed_cells += 1;
                            self.impute_cell(row, column)
                        }
                    })
                    .collect::<Vec<f64>>()
            })
            .collect();
        Ok(FilledMatrix {
            columns: matrix.columns.clone(),
            rows,
            imputed_cells,
        })
    }
}

/// Euclidean distance over the coordinates present in both rows, scaled up
/// by `width / shared` to compensate for the skipped ones.
///
/// Returns `None` when the rows share no present coordinate.
pub fn nan_euclidean(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let mut shared = 0usize;
    let mut sum = 0.0;
    for (x, y) in a.iter().zip(b) {
        if let (Some(x), Some(y)) = (x, y) {
            shared += 1;
            sum += (x - y).powi(2);
        }
    }
    if shared == 0 {
        return None;
    }
    let width = a.len().max(b.len()) as f64;
    Some((width / shared as f64 * sum).sqrt())
}

/// `candidates` holds `(distance, position, value)`, nearest first.
fn combine(candidates: &[(f64, usize, f64)], weighting: Weighting) -> f64 {
    let uniform = |items: &[&(f64, usize, f64)]| {
        items.iter().map(|(_, _, value)| value).sum::<f64>() / items.len() as f64
    };
    match weighting {
        Weighting::Uniform => uniform(&candidates.iter().collect::<Vec<_>>()),
        Weighting::Distance => {
            let exact: Vec<_> = candidates
                .iter()
                .filter(|(distance, _, _)| *distance == 0.0)
                .collect();
            if !exact.is_empty() {
                return uniform(&exact);
            }
            let (weighted, total) = candidates
                .iter()
                .fold((0.0, 0.0), |(weighted, total), (distance, _, value)| {
                    let weight = 1.0 / distance;
                    (weighted + weight * value, total + weight)
                });
            weighted / total
        }
    }
}
