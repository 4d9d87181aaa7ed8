//! Compressed Sparse Row (CSR) matrix format
//!
//! CSR format stores:
//! - `values`: Non-zero entries in row-major order
//! - `col_indices`: Column index for each value (sorted within a row)
//! - `row_ptrs`: Index into values/col_indices where each row starts
//!
//! Matrices used in finite element assembly are created from a
//! [`SparsityPattern`] with all values zero; assembly then only adds into
//! existing entries. Adding outside the pattern is an error, not a silent
//! reallocation.

use super::pattern::SparsityPattern;
use crate::traits::{LinearOperator, Scalar};
use ndarray::{Array1, Array2};
use std::ops::Range;
use thiserror::Error;

/// Errors raised by sparse matrix updates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SparseError {
    #[error("Entry ({row}, {col}) is not part of the sparsity pattern")]
    EntryNotInPattern { row: usize, col: usize },
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Compressed Sparse Row (CSR) matrix format
///
/// Memory-efficient storage for sparse matrices with O(nnz) space complexity.
/// Matrix-vector products are O(nnz) instead of O(n²) for dense matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T: Scalar> {
    /// Number of rows
    pub num_rows: usize,
    /// Number of columns
    pub num_cols: usize,
    /// Non-zero values in row-major order
    pub values: Vec<T>,
    /// Column indices for each value
    pub col_indices: Vec<usize>,
    /// Row pointers: row_ptrs[i] is the start index in values/col_indices for row i
    /// row_ptrs[num_rows] = nnz (total number of non-zeros)
    pub row_ptrs: Vec<usize>,
}

impl<T: Scalar> CsrMatrix<T> {
    /// Create a new empty CSR matrix
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            values: Vec::new(),
            col_indices: Vec::new(),
            row_ptrs: vec![0; num_rows + 1],
        }
    }

    /// Create a zero matrix whose structure is given by `pattern`
    pub fn from_pattern(pattern: &SparsityPattern) -> Self {
        Self {
            num_rows: pattern.num_rows(),
            num_cols: pattern.num_cols(),
            values: vec![T::zero(); pattern.nnz()],
            col_indices: pattern.col_indices().to_vec(),
            row_ptrs: pattern.row_ptrs().to_vec(),
        }
    }

    /// Create a CSR matrix from a dense matrix
    ///
    /// Only stores entries with magnitude > threshold
    pub fn from_dense(dense: &Array2<T>, threshold: T) -> Self {
        let num_rows = dense.nrows();
        let num_cols = dense.ncols();

        let mut values = Vec::new();
        let mut col_indices = Vec::new();
        let mut row_ptrs = vec![0usize; num_rows + 1];

        for i in 0..num_rows {
            for j in 0..num_cols {
                let val = dense[[i, j]];
                if val.abs() > threshold {
                    values.push(val);
                    col_indices.push(j);
                }
            }
            row_ptrs[i + 1] = values.len();
        }

        Self {
            num_rows,
            num_cols,
            values,
            col_indices,
            row_ptrs,
        }
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Get the range of indices in values/col_indices for a given row
    pub fn row_range(&self, row: usize) -> Range<usize> {
        self.row_ptrs[row]..self.row_ptrs[row + 1]
    }

    /// Get the (col, value) pairs for a row
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.row_range(row);
        self.col_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Position of (i, j) in `values`, if stored
    pub fn position(&self, i: usize, j: usize) -> Option<usize> {
        if i >= self.num_rows {
            return None;
        }
        let range = self.row_range(i);
        self.col_indices[range.clone()]
            .binary_search(&j)
            .ok()
            .map(|offset| range.start + offset)
    }

    /// Get element at (i, j), returns 0 if not stored
    pub fn get(&self, i: usize, j: usize) -> T {
        self.position(i, j)
            .map(|idx| self.values[idx])
            .unwrap_or_else(T::zero)
    }

    /// Add `value` to the stored entry (i, j)
    pub fn add(&mut self, i: usize, j: usize, value: T) -> Result<(), SparseError> {
        let idx = self
            .position(i, j)
            .ok_or(SparseError::EntryNotInPattern { row: i, col: j })?;
        self.values[idx] += value;
        Ok(())
    }

    /// Overwrite the stored entry (i, j)
    pub fn set(&mut self, i: usize, j: usize, value: T) -> Result<(), SparseError> {
        let idx = self
            .position(i, j)
            .ok_or(SparseError::EntryNotInPattern { row: i, col: j })?;
        self.values[idx] = value;
        Ok(())
    }

    /// Scatter-add a dense local block: A[indices[i], indices[j]] += local[i, j]
    ///
    /// Every target entry is looked up before any value is written, so on
    /// error the matrix is left unchanged.
    pub fn add_local(&mut self, indices: &[usize], local: &Array2<T>) -> Result<(), SparseError> {
        if local.nrows() != indices.len() || local.ncols() != indices.len() {
            return Err(SparseError::DimensionMismatch {
                expected: indices.len(),
                got: local.nrows().max(local.ncols()),
            });
        }

        let positions = indices
            .iter()
            .flat_map(|&gi| indices.iter().map(move |&gj| (gi, gj)))
            .map(|(gi, gj)| {
                self.position(gi, gj)
                    .ok_or(SparseError::EntryNotInPattern { row: gi, col: gj })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // `local.iter()` walks the block in row-major order, like `positions`
        for (idx, &value) in positions.into_iter().zip(local.iter()) {
            self.values[idx] += value;
        }
        Ok(())
    }

    /// Reset every stored value to zero, keeping the structure
    pub fn clear_values(&mut self) {
        self.values.iter_mut().for_each(|v| *v = T::zero());
    }

    /// Matrix-vector product: y = A * x
    pub fn matvec(&self, x: &Array1<T>) -> Array1<T> {
        assert_eq!(x.len(), self.num_cols, "Input vector size mismatch");

        let mut y = Array1::from_elem(self.num_rows, T::zero());

        for i in 0..self.num_rows {
            let mut sum = T::zero();
            for idx in self.row_range(i) {
                let j = self.col_indices[idx];
                sum += self.values[idx] * x[j];
            }
            y[i] = sum;
        }

        y
    }

    /// Extract diagonal elements
    pub fn diagonal(&self) -> Array1<T> {
        let n = self.num_rows.min(self.num_cols);
        Array1::from_iter((0..n).map(|i| self.get(i, i)))
    }

    /// Check A[i, j] == A[j, i] within `tol` for all stored entries
    pub fn is_symmetric(&self, tol: T) -> bool {
        if self.num_rows != self.num_cols {
            return false;
        }

        (0..self.num_rows).all(|i| {
            self.row_entries(i)
                .all(|(j, a_ij)| (a_ij - self.get(j, i)).abs() <= tol)
        })
    }
}

impl<T: Scalar> LinearOperator<T> for CsrMatrix<T> {
    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn num_cols(&self) -> usize {
        self.num_cols
    }

    fn apply(&self, x: &Array1<T>) -> Array1<T> {
        self.matvec(x)
    }
}
