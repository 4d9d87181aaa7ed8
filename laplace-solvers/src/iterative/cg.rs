//! CG (Conjugate Gradient) solver
//!
//! The preconditioned Conjugate Gradient method for symmetric positive definite
//! systems. Convergence is measured on the absolute norm of the unpreconditioned
//! residual `b - A x`, checked once before the first iteration and after every
//! iteration.

use crate::traits::{LinearOperator, Preconditioner, Scalar};
use ndarray::Array1;

/// CG solver configuration
#[derive(Debug, Clone)]
pub struct CgConfig<R> {
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Absolute tolerance on the residual norm
    pub tolerance: R,
    /// Log progress every N iterations (0 = no output)
    pub print_interval: usize,
}

impl Default for CgConfig<f64> {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-12,
            print_interval: 0,
        }
    }
}

/// Why the iteration stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CgStatus {
    /// Residual norm fell below the tolerance
    Converged,
    /// Iteration cap reached first
    MaxIterations,
    /// p^T A p vanished or became negative; the operator is not SPD
    Breakdown,
}

/// CG solver result
#[derive(Debug)]
pub struct CgSolution<T: Scalar> {
    /// Solution vector
    pub x: Array1<T>,
    /// Number of iterations
    pub iterations: usize,
    /// Final absolute residual norm
    pub residual: T,
    /// Outcome of the iteration
    pub status: CgStatus,
}

/// Solve Ax = b using the preconditioned Conjugate Gradient method
///
/// `x0` is the initial guess. Only correct for symmetric positive definite
/// `A` and a symmetric positive definite preconditioner.
pub fn pcg<T, A, P>(
    operator: &A,
    precond: &P,
    b: &Array1<T>,
    x0: Array1<T>,
    config: &CgConfig<T>,
) -> CgSolution<T>
where
    T: Scalar,
    A: LinearOperator<T>,
    P: Preconditioner<T>,
{
    assert_eq!(b.len(), operator.num_rows(), "Right-hand side size mismatch");
    assert_eq!(x0.len(), operator.num_cols(), "Initial guess size mismatch");

    let mut x = x0;

    // r = b - A x
    let mut r = b - &operator.apply(&x);
    let mut res_norm = vector_norm(&r);

    if res_norm < config.tolerance {
        return CgSolution {
            x,
            iterations: 0,
            residual: res_norm,
            status: CgStatus::Converged,
        };
    }

    let mut z = precond.apply(&r);
    let mut p = z.clone();
    let mut rho = inner_product(&r, &z);

    for iter in 1..=config.max_iterations {
        // q = A * p
        let q = operator.apply(&p);

        let pq = inner_product(&p, &q);
        if pq <= T::zero() {
            log::warn!("CG breakdown at iteration {}: p^T A p = {:?}", iter, pq);
            return CgSolution {
                x,
                iterations: iter,
                residual: res_norm,
                status: CgStatus::Breakdown,
            };
        }

        let alpha = rho / pq;

        // x = x + alpha * p, r = r - alpha * q
        x.scaled_add(alpha, &p);
        r.scaled_add(-alpha, &q);

        res_norm = vector_norm(&r);

        if config.print_interval > 0 && iter % config.print_interval == 0 {
            log::debug!(
                "CG iteration {}: residual = {:.6e}",
                iter,
                res_norm.to_f64_lossless()
            );
        }

        if res_norm < config.tolerance {
            return CgSolution {
                x,
                iterations: iter,
                residual: res_norm,
                status: CgStatus::Converged,
            };
        }

        z = precond.apply(&r);
        let rho_new = inner_product(&r, &z);
        let beta = rho_new / rho;
        rho = rho_new;

        // p = z + beta * p
        p = &z + &p.mapv(|pi| pi * beta);
    }

    CgSolution {
        x,
        iterations: config.max_iterations,
        residual: res_norm,
        status: CgStatus::MaxIterations,
    }
}

#[inline]
fn inner_product<T: Scalar>(x: &Array1<T>, y: &Array1<T>) -> T {
    x.iter()
        .zip(y.iter())
        .fold(T::zero(), |acc, (&xi, &yi)| acc + xi * yi)
}

#[inline]
fn vector_norm<T: Scalar>(x: &Array1<T>) -> T {
    inner_product(x, x).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preconditioners::SsorPreconditioner;
    use crate::sparse::{CsrMatrix, DynamicSparsityPattern};
    use crate::traits::IdentityPreconditioner;
    use ndarray::array;

    fn laplacian_1d(n: usize) -> CsrMatrix<f64> {
        let mut dsp = DynamicSparsityPattern::new(n, n);
        for i in 0..n - 1 {
            dsp.add_block(&[i, i + 1]);
        }
        let mut a = CsrMatrix::from_pattern(&dsp.compress());
        for i in 0..n - 1 {
            a.add_local(&[i, i + 1], &array![[1.0, -1.0], [-1.0, 1.0]])
                .unwrap();
        }
        // Dirichlet ends
        a.add(0, 0, 1.0).unwrap();
        a.add(n - 1, n - 1, 1.0).unwrap();
        a
    }

    fn cg(a: &CsrMatrix<f64>, b: &Array1<f64>, config: &CgConfig<f64>) -> CgSolution<f64> {
        pcg(a, &IdentityPreconditioner, b, Array1::zeros(b.len()), config)
    }

    #[test]
    fn test_cg_spd() {
        // Symmetric positive definite matrix
        let dense = array![[4.0_f64, 1.0], [1.0, 3.0],];

        let a = CsrMatrix::from_dense(&dense, 1e-15);
        let b = array![1.0_f64, 2.0];

        let config = CgConfig {
            max_iterations: 100,
            tolerance: 1e-10,
            print_interval: 0,
        };

        let solution = cg(&a, &b, &config);

        assert_eq!(solution.status, CgStatus::Converged, "CG should converge for SPD matrix");
        assert!(solution.iterations <= 2);

        let ax = a.matvec(&solution.x);
        let error: f64 = (&ax - &b).iter().map(|e| e * e).sum::<f64>().sqrt();
        assert!(error < 1e-8, "Solution should satisfy Ax = b");
    }

    #[test]
    fn test_cg_zero_rhs_needs_no_iterations() {
        let a = laplacian_1d(5);
        let b = Array1::zeros(5);

        let solution = cg(&a, &b, &CgConfig::default());

        assert_eq!(solution.status, CgStatus::Converged);
        assert_eq!(solution.iterations, 0);
    }

    #[test]
    fn test_pcg_ssor_beats_plain_cg() {
        let n = 200;
        let a = laplacian_1d(n);
        let b = Array1::from_iter((0..n).map(|i| ((i * 7919) % 13) as f64 - 6.0));
        let config = CgConfig {
            max_iterations: 1000,
            tolerance: 1e-8,
            print_interval: 0,
        };

        let plain = cg(&a, &b, &config);
        let precond = SsorPreconditioner::from_csr(&a, 1.2);
        let ssor = pcg(&a, &precond, &b, Array1::zeros(n), &config);

        assert_eq!(plain.status, CgStatus::Converged);
        assert_eq!(ssor.status, CgStatus::Converged);
        assert!(ssor.iterations < plain.iterations);

        let residual = &b - &a.matvec(&ssor.x);
        assert!(vector_norm(&residual) < 1e-8);
    }

    #[test]
    fn test_pcg_reports_iteration_cap() {
        let a = laplacian_1d(50);
        let b = Array1::from_elem(50, 1.0);
        let config = CgConfig {
            max_iterations: 3,
            tolerance: 1e-12,
            print_interval: 1,
        };

        let solution = cg(&a, &b, &config);

        assert_eq!(solution.status, CgStatus::MaxIterations);
        assert_eq!(solution.iterations, 3);
    }

    #[test]
    fn test_pcg_detects_indefinite_operator() {
        let dense = array![[1.0_f64, 0.0], [0.0, -1.0]];
        let a = CsrMatrix::from_dense(&dense, 1e-15);
        let b = array![0.0, 1.0];

        let solution = cg(&a, &b, &CgConfig::default());

        assert_eq!(solution.status, CgStatus::Breakdown);
    }

    #[test]
    fn test_pcg_uses_initial_guess() {
        let a = laplacian_1d(4);
        let exact = array![1.0, 2.0, 3.0, 4.0];
        let b = a.matvec(&exact);

        let solution = pcg(
            &a,
            &IdentityPreconditioner,
            &b,
            exact.clone(),
            &CgConfig::default(),
        );

        assert_eq!(solution.iterations, 0);
        assert_eq!(solution.x, exact);
    }
}
