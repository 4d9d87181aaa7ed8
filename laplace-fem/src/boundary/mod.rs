//! Boundary condition handling
//!
//! Dirichlet conditions only: interpolation of boundary data onto DoFs and
//! elimination from the assembled system.

mod dirichlet;

pub use dirichlet::*;

use solvers::SparseError;
use thiserror::Error;

/// Errors raised while applying boundary conditions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryError {
    #[error("boundary DoF {dof} out of range (system has {n_dofs} DoFs)")]
    DofOutOfRange { dof: usize, n_dofs: usize },

    #[error("boundary vertex {vertex} carries no degree of freedom")]
    UnnumberedVertex { vertex: usize },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Sparse(#[from] SparseError),
}
