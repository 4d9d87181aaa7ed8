//! Finite element matrix assembly
//!
//! Assembles the global Laplace system over active cells and one stiffness
//! matrix per level over the full cell hierarchy. Both scatter local blocks
//! into matrices whose sparsity pattern was fixed beforehand.

mod cell;
mod levels;
mod system;

pub use cell::*;
pub use levels::*;
pub use system::*;

use crate::basis::BasisError;
use crate::dofs::DofError;
use solvers::SparseError;
use thiserror::Error;

/// Errors raised during assembly
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("level {level} has no matrix (only {n_levels} allocated)")]
    MissingLevel { level: usize, n_levels: usize },

    #[error(transparent)]
    Sparse(#[from] SparseError),

    #[error(transparent)]
    Dof(#[from] DofError),

    #[error(transparent)]
    Basis(#[from] BasisError),
}
