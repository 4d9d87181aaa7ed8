//! Solution output

mod gnuplot;

pub use gnuplot::*;

use crate::dofs::DofError;
use thiserror::Error;

/// Errors raised while writing output files
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("solution has {actual} entries but the DoF handler numbers {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Dof(#[from] DofError),
}
