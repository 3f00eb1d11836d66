/// Row-major numeric features with possibly absent cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<f64>>>,
}

impl FeatureMatrix {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn push_row(&mut self, row: Vec<Option<f64>>) {
        debug_assert_eq!(row.len(), self.width());
        self.rows.push(row);
    }

    pub fn absent_cells(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|cell| cell.is_none()).count())
            .sum()
    }

    /// Mean of the present values of column `idx`, or `None` if it has none.
    pub fn column_mean(&self, idx: usize) -> Option<f64> {
        let (sum, count) = self
            .rows
            .iter()
            .filter_map(|row| row[idx])
            .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
        (count > 0).then(|| sum / count as f64)
    }
}

/// A feature matrix with every cell present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilledMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    /// Cells that were absent in the input.
    pub imputed_cells: usize,
}
