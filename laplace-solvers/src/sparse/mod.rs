//! Sparse matrix structures (CSR format)
//!
//! This module provides sparsity patterns and the Compressed Sparse Row (CSR)
//! format for efficient storage and matrix-vector operations with sparse matrices.

mod csr;
mod pattern;

pub use csr::{CsrMatrix, SparseError};
pub use pattern::{DynamicSparsityPattern, SparsityPattern};
