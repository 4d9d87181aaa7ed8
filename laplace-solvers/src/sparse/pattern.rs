//! Sparsity patterns
//!
//! A [`DynamicSparsityPattern`] collects couplings one set of indices at a time
//! (typically the DoF indices of a cell). It is then frozen into a compressed
//! [`SparsityPattern`], which fixes the structure of a [`CsrMatrix`](super::CsrMatrix)
//! before any value is written.

use std::collections::BTreeSet;
use std::ops::Range;

/// Growable sparsity pattern with one ordered column set per row
#[derive(Debug, Clone)]
pub struct DynamicSparsityPattern {
    num_cols: usize,
    rows: Vec<BTreeSet<usize>>,
}

impl DynamicSparsityPattern {
    /// Create an empty pattern
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self {
            num_cols,
            rows: vec![BTreeSet::new(); num_rows],
        }
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Add a single entry
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of range.
    pub fn add(&mut self, row: usize, col: usize) {
        assert!(col < self.num_cols, "column {} out of range", col);
        self.rows[row].insert(col);
    }

    /// Couple every index in `indices` with every other one (and itself)
    pub fn add_block(&mut self, indices: &[usize]) {
        for &i in indices {
            for &j in indices {
                self.add(i, j);
            }
        }
    }

    /// Number of entries added so far
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|r| r.len()).sum()
    }

    /// Freeze into the compressed representation
    pub fn compress(self) -> SparsityPattern {
        let num_rows = self.rows.len();
        let mut row_ptrs = Vec::with_capacity(num_rows + 1);
        let mut col_indices = Vec::with_capacity(self.nnz());

        row_ptrs.push(0);
        for row in self.rows {
            col_indices.extend(row);
            row_ptrs.push(col_indices.len());
        }

        SparsityPattern {
            num_rows,
            num_cols: self.num_cols,
            row_ptrs,
            col_indices,
        }
    }
}

/// Compressed, immutable sparsity pattern
///
/// Column indices within a row are sorted and unique, so lookups are a binary
/// search over the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparsityPattern {
    num_rows: usize,
    num_cols: usize,
    row_ptrs: Vec<usize>,
    col_indices: Vec<usize>,
}

impl SparsityPattern {
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.col_indices.len()
    }

    /// Largest number of entries in any row
    pub fn max_row_length(&self) -> usize {
        (0..self.num_rows)
            .map(|r| self.row_ptrs[r + 1] - self.row_ptrs[r])
            .max()
            .unwrap_or(0)
    }

    /// Range of positions belonging to `row`
    pub fn row_range(&self, row: usize) -> Range<usize> {
        self.row_ptrs[row]..self.row_ptrs[row + 1]
    }

    /// Column indices of `row`, sorted ascending
    pub fn row(&self, row: usize) -> &[usize] {
        &self.col_indices[self.row_range(row)]
    }

    /// Position of entry (row, col) in the value array, if it is part of the pattern
    pub fn position(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.num_rows {
            return None;
        }
        let range = self.row_range(row);
        self.col_indices[range.clone()]
            .binary_search(&col)
            .ok()
            .map(|offset| range.start + offset)
    }

    /// Whether (row, col) is part of the pattern
    pub fn exists(&self, row: usize, col: usize) -> bool {
        self.position(row, col).is_some()
    }

    /// Whether the pattern equals its transpose
    pub fn is_symmetric(&self) -> bool {
        self.num_rows == self.num_cols
            && (0..self.num_rows).all(|i| self.row(i).iter().all(|&j| self.exists(j, i)))
    }

    pub(crate) fn row_ptrs(&self) -> &[usize] {
        &self.row_ptrs
    }

    pub(crate) fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }
}
