use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Wealth trajectories of the first `k` trials of a run.
///
/// Dense row-major matrix of shape `(k, rounds + 1)`. Row `i` is the path of
/// trial `i`; column 0 is the initial wealth and column `t + 1` the wealth
/// after round `t`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampledPaths {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl SampledPaths {
    /// Allocates `paths` rows for a run of `rounds` rounds, column 0 set to
    /// `initial_wealth` and every other cell zero.
    #[must_use]
    pub fn with_initial(paths: usize, rounds: usize, initial_wealth: f64) -> Self {
        let cols = rounds + 1;
        let mut data = vec![0.0; paths * cols];
        for row in data.chunks_exact_mut(cols) {
            row[0] = initial_wealth;
        }
        Self {
            rows: paths,
            cols,
            data,
        }
    }

    /// Builds the matrix from explicit rows.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::RaggedPaths`] when rows differ in length or are empty.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, DomainError> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 || rows.iter().any(|row| row.len() != cols) {
            return Err(DomainError::RaggedPaths);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Writes `wealth[i]` into column `step` of row `i` for every row.
    ///
    /// `wealth` must hold at least one value per row; extra values are ignored.
    pub fn record(&mut self, step: usize, wealth: &[f64]) {
        for (row, &value) in self.data.chunks_exact_mut(self.cols).zip(wealth) {
            row[step] = value;
        }
    }

    /// Number of sampled trials `k`.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of recorded steps, `rounds + 1`.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Path of sampled trial `index`, if present.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    /// Iterates over the sampled paths in trial order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // `cols` is zero only for the empty default matrix.
        self.data.chunks_exact(self.cols.max(1))
    }

    /// Wealth of every sampled trial at `step`.
    #[must_use]
    pub fn column(&self, step: usize) -> Vec<f64> {
        self.iter_rows().filter_map(|row| row.get(step).copied()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_initial_sets_first_column() {
        let paths = SampledPaths::with_initial(3, 4, 2.5);
        assert_eq!(paths.shape(), (3, 5));
        assert_eq!(paths.column(0), vec![2.5; 3]);
        assert_eq!(paths.column(1), vec![0.0; 3]);
    }

    #[test]
    fn test_record_writes_only_sampled_rows() {
        let mut paths = SampledPaths::with_initial(2, 2, 1.0);
        paths.record(1, &[1.1, 0.9, 5.0, 5.0]);
        paths.record(2, &[1.2, 0.8, 5.0, 5.0]);
        assert_eq!(paths.row(0), Some(&[1.0, 1.1, 1.2][..]));
        assert_eq!(paths.row(1), Some(&[1.0, 0.9, 0.8][..]));
        assert_eq!(paths.row(2), None);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        assert_eq!(
            SampledPaths::from_rows(vec![vec![1.0, 2.0], vec![1.0]]),
            Err(DomainError::RaggedPaths)
        );
        assert_eq!(SampledPaths::from_rows(vec![]), Err(DomainError::RaggedPaths));

        let paths = SampledPaths::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(paths.iter_rows().count(), 2);
        assert_eq!(paths.column(1), vec![2.0, 4.0]);
    }

    #[test]
    fn test_empty_default_has_no_rows() {
        let paths = SampledPaths::default();
        assert_eq!(paths.iter_rows().count(), 0);
        assert_eq!(paths.shape(), (0, 0));
    }
}
