//! Sparse linear algebra for finite element systems
//!
//! This crate provides the pieces needed to store and solve the symmetric
//! positive definite systems produced by a finite element discretization.
//!
//! # Features
//!
//! - **Sparsity patterns**: dynamic (set based) construction, compressed storage
//! - **Sparse matrices**: CSR format with pattern-checked additive updates
//! - **Preconditioners**: SSOR with configurable relaxation factor
//! - **Iterative solvers**: preconditioned Conjugate Gradient
//! - **Generic scalar types**: `f64` and `f32`
//!
//! # Example
//!
//! ```ignore
//! use solvers::{CgConfig, CsrMatrix, SparsityPattern, SsorPreconditioner, pcg};
//!
//! let mut matrix = CsrMatrix::from_pattern(&pattern);
//! matrix.add_local(&dof_indices, &cell_matrix)?;
//!
//! let precond = SsorPreconditioner::from_csr(&matrix, 1.2);
//! let solution = pcg(&matrix, &precond, &rhs, x0, &CgConfig::default());
//! ```

pub mod iterative;
pub mod preconditioners;
pub mod sparse;
pub mod traits;

// Re-export main types
pub use sparse::{CsrMatrix, DynamicSparsityPattern, SparseError, SparsityPattern};
pub use traits::{LinearOperator, Preconditioner, Scalar};

// Re-export iterative solvers
pub use iterative::{CgConfig, CgSolution, CgStatus, pcg};

// Re-export preconditioners
pub use preconditioners::{IdentityPreconditioner, SsorPreconditioner};
