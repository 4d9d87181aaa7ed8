//! Linear solver for the eliminated Laplace system
//!
//! Conjugate Gradient preconditioned with SSOR, from the `laplace-mg-solvers`
//! crate. Convergence is declared on the absolute residual norm.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use solvers::{CgConfig, CgStatus, CsrMatrix, SsorPreconditioner, pcg};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Iteration cap
    pub max_iterations: usize,
    /// Absolute tolerance on ||b - A x||
    pub tolerance: f64,
    /// SSOR relaxation factor, in (0, 2)
    pub relaxation: f64,
    /// Log the residual every N iterations (0 = never)
    pub log_interval: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-12,
            relaxation: 1.2,
            log_interval: 0,
        }
    }
}

/// Outcome of a successful solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveSummary {
    /// CG iterations performed
    pub iterations: usize,
    /// Final absolute residual norm
    pub residual: f64,
    /// Wall time spent in the solver
    pub elapsed: Duration,
}

/// Solver errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("Solver failed to converge after {iterations} iterations (residual: {residual:e})")]
    ConvergenceFailure { iterations: usize, residual: f64 },
    #[error("CG breakdown after {iterations} iterations: matrix is not positive definite")]
    Breakdown { iterations: usize },
    #[error("Matrix dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Solve `matrix * solution = rhs` with SSOR-preconditioned CG
///
/// `solution` is the initial guess on entry and holds the result on success.
pub fn solve(
    matrix: &CsrMatrix<f64>,
    rhs: &Array1<f64>,
    solution: &mut Array1<f64>,
    config: &SolverConfig,
) -> Result<SolveSummary, SolverError> {
    for len in [matrix.num_cols, rhs.len(), solution.len()] {
        if len != matrix.num_rows {
            return Err(SolverError::DimensionMismatch {
                expected: matrix.num_rows,
                actual: len,
            });
        }
    }

    let start = Instant::now();

    let cg_config = CgConfig {
        max_iterations: config.max_iterations,
        tolerance: config.tolerance,
        print_interval: config.log_interval,
    };
    let precond = SsorPreconditioner::from_csr(matrix, config.relaxation);
    let result = pcg(matrix, &precond, rhs, solution.clone(), &cg_config);

    let elapsed = start.elapsed();
    log::debug!(
        "CG: {} DoFs, {} nnz, {} iterations, residual {:.3e}, {:.1}ms",
        matrix.num_rows,
        matrix.nnz(),
        result.iterations,
        result.residual,
        elapsed.as_secs_f64() * 1000.0
    );

    match result.status {
        CgStatus::Converged => {
            *solution = result.x;
            Ok(SolveSummary {
                iterations: result.iterations,
                residual: result.residual,
                elapsed,
            })
        }
        CgStatus::MaxIterations => Err(SolverError::ConvergenceFailure {
            iterations: result.iterations,
            residual: result.residual,
        }),
        CgStatus::Breakdown => Err(SolverError::Breakdown {
            iterations: result.iterations,
        }),
    }
}
