use std::error::Error;
use std::fmt;

/// Compressed sparse row matrix over a fixed number of columns.
///
/// Rows are stored as (column index, value) pairs with strictly increasing
/// column indices within each row. This is the feature-matrix representation
/// produced by the TF-IDF vectorizer: most entries are zero, so dense storage
/// would waste both memory and model-fitting time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CsrMatrix {
    indptr: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<f32>,
    ncols: usize,
}

impl CsrMatrix {
    /// Build a matrix from per-row (column, value) pairs.
    ///
    /// Each row must have strictly increasing column indices below `ncols`.
    pub fn from_rows(rows: Vec<Vec<(usize, f32)>>, ncols: usize) -> Result<Self, ShapeError> {
        let nnz = rows.iter().map(|r| r.len()).sum();
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);

        indptr.push(0);
        for (row_idx, row) in rows.into_iter().enumerate() {
            let mut prev: Option<usize> = None;
            for (col, value) in row {
                if col >= ncols {
                    return Err(ShapeError {
                        row: row_idx,
                        col,
                        ncols,
                    });
                }
                if let Some(p) = prev {
                    assert!(col > p, "column indices within a row must be increasing");
                }
                prev = Some(col);
                indices.push(col);
                values.push(value);
            }
            indptr.push(indices.len());
        }

        Ok(CsrMatrix {
            indptr,
            indices,
            values,
            ncols,
        })
    }

    pub fn nrows(&self) -> usize {
        self.indptr.len() - 1
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Non-zero entries of one row as parallel (columns, values) slices.
    pub fn row(&self, row: usize) -> (&[usize], &[f32]) {
        let start = self.indptr[row];
        let end = self.indptr[row + 1];
        (&self.indices[start..end], &self.values[start..end])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = (&[usize], &[f32])> {
        (0..self.nrows()).map(move |r| self.row(r))
    }

    /// New matrix containing the given rows, in order. Indices may repeat.
    pub fn select_rows(&self, rows: &[usize]) -> CsrMatrix {
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut values = Vec::new();

        indptr.push(0);
        for &row in rows {
            let (cols, vals) = self.row(row);
            indices.extend_from_slice(cols);
            values.extend_from_slice(vals);
            indptr.push(indices.len());
        }

        CsrMatrix {
            indptr,
            indices,
            values,
            ncols: self.ncols,
        }
    }

    /// Dot product between one row and a dense weight vector.
    pub fn row_dot(&self, row: usize, weights: &[f32]) -> f32 {
        let (cols, vals) = self.row(row);
        cols.iter()
            .zip(vals.iter())
            .map(|(&c, &v)| v * weights[c])
            .sum()
    }

    /// Highest column index actually present, or `None` for an all-zero matrix.
    pub fn max_col(&self) -> Option<usize> {
        self.indices.iter().copied().max()
    }
}

#[derive(Debug, Clone)]
pub struct ShapeError {
    row: usize,
    col: usize,
    ncols: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "column index {} in row {} out of bounds for {} columns",
            self.col, self.row, self.ncols
        )
    }
}

impl Error for ShapeError {}
