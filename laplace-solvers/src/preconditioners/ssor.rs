//! SSOR preconditioner
//!
//! Symmetric successive over-relaxation. With A = L + D + U and relaxation
//! factor ω, one application computes
//!
//! ```text
//! y = (2 - ω) (D + ωU)^(-1) D (D + ωL)^(-1) r
//! ```
//!
//! i.e. a forward Gauss-Seidel-like sweep, a diagonal scaling and a backward
//! sweep. For symmetric A with positive diagonal and 0 < ω < 2 the operator is
//! symmetric positive definite, so it can be used inside CG.

use crate::sparse::CsrMatrix;
use crate::traits::{LinearOperator, Preconditioner, Scalar};
use ndarray::Array1;

/// SSOR preconditioner borrowing the system matrix
#[derive(Debug, Clone)]
pub struct SsorPreconditioner<'a, T: Scalar> {
    matrix: &'a CsrMatrix<T>,
    /// Position of the diagonal entry of each row in `matrix.values`
    diag_positions: Vec<Option<usize>>,
    omega: T,
}

impl<'a, T: Scalar> SsorPreconditioner<'a, T> {
    /// Create an SSOR preconditioner for `matrix` with relaxation factor `omega`
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not square.
    pub fn from_csr(matrix: &'a CsrMatrix<T>, omega: T) -> Self {
        assert!(matrix.is_square(), "SSOR requires a square matrix");

        let diag_positions = (0..matrix.num_rows)
            .map(|i| matrix.position(i, i))
            .collect();

        Self {
            matrix,
            diag_positions,
            omega,
        }
    }

    /// Diagonal entry of row i, or one when it is missing or vanishing
    #[inline]
    fn diag(&self, i: usize) -> T {
        let tiny = T::from_f64_lossy(1e-30);
        match self.diag_positions[i] {
            Some(idx) if !self.matrix.values[idx].is_zero_approx(tiny) => self.matrix.values[idx],
            _ => T::one(),
        }
    }
}

impl<T: Scalar> Preconditioner<T> for SsorPreconditioner<'_, T> {
    fn apply(&self, r: &Array1<T>) -> Array1<T> {
        let a = self.matrix;
        let n = a.num_rows;
        assert_eq!(r.len(), n, "Input vector size mismatch");

        let omega = self.omega;
        let two = T::one() + T::one();
        let mut y = r.clone();

        // (D + ωL) y = r
        for i in 0..n {
            let mut sum = T::zero();
            for (j, a_ij) in a.row_entries(i) {
                if j < i {
                    sum += a_ij * y[j];
                }
            }
            y[i] = (y[i] - omega * sum) / self.diag(i);
        }

        for i in 0..n {
            y[i] *= (two - omega) * self.diag(i);
        }

        // (D + ωU) y = z
        for i in (0..n).rev() {
            let mut sum = T::zero();
            for (j, a_ij) in a.row_entries(i) {
                if j > i {
                    sum += a_ij * y[j];
                }
            }
            y[i] = (y[i] - omega * sum) / self.diag(i);
        }

        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_ssor_on_diagonal_matrix_is_scaled_jacobi() {
        let dense = array![[2.0_f64, 0.0], [0.0, 4.0]];
        let a = CsrMatrix::from_dense(&dense, 1e-15);
        let precond = SsorPreconditioner::from_csr(&a, 1.0);

        // No off-diagonal coupling: y = (2 - ω) D^-1 r
        let y = precond.apply(&array![2.0, 8.0]);
        assert_relative_eq!(y[0], 1.0, epsilon = 1e-14);
        assert_relative_eq!(y[1], 2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_ssor_matches_explicit_factors() {
        let dense = array![[4.0_f64, -1.0, 0.0], [-1.0, 4.0, -1.0], [0.0, -1.0, 4.0]];
        let a = CsrMatrix::from_dense(&dense, 1e-15);
        let omega = 1.2;
        let precond = SsorPreconditioner::from_csr(&a, omega);

        let r = array![1.0, 2.0, 3.0];
        let y = precond.apply(&r);

        // M y should reproduce r with M = (D + ωL) D^-1 (D + ωU) / (2 - ω)
        let d = 4.0;
        let u = [
            (y[0] * d + omega * (-1.0) * y[1]),
            (y[1] * d + omega * (-1.0) * y[2]),
            y[2] * d,
        ];
        let w = [u[0] / d, u[1] / d, u[2] / d];
        let m_y = [
            d * w[0] / (2.0 - omega),
            (d * w[1] + omega * (-1.0) * w[0]) / (2.0 - omega),
            (d * w[2] + omega * (-1.0) * w[1]) / (2.0 - omega),
        ];

        for i in 0..3 {
            assert_relative_eq!(m_y[i], r[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_ssor_is_symmetric_operator() {
        let dense = array![[4.0_f64, -1.0, -1.0], [-1.0, 4.0, -1.0], [-1.0, -1.0, 4.0]];
        let a = CsrMatrix::from_dense(&dense, 1e-15);
        let precond = SsorPreconditioner::from_csr(&a, 1.2);

        let e0 = precond.apply(&array![1.0, 0.0, 0.0]);
        let e1 = precond.apply(&array![0.0, 1.0, 0.0]);

        assert_relative_eq!(e0[1], e1[0], epsilon = 1e-12);
    }
}
