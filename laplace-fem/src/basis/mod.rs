//! Finite element basis functions
//!
//! Bilinear Lagrange element on quadrilaterals, the reference-to-physical
//! mapping, and per-cell evaluation under a quadrature rule.

mod lagrange;
mod shape;
mod values;

pub use lagrange::*;
pub use shape::*;
pub use values::*;

use thiserror::Error;

/// Errors raised while evaluating shape functions on a cell
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BasisError {
    #[error("degenerate cell: Jacobian determinant {det:e}")]
    DegenerateCell { det: f64 },
}
