//! Shape function values and gradients on a concrete cell
//!
//! [`CellValues`] caches the reference values of the element at every
//! quadrature point once, and on [`CellValues::reinit`] maps gradients and
//! integration weights to the physical cell.

use super::{BasisError, FeQ1, Jacobian};
use crate::quadrature::QuadratureRule;

/// Per-cell evaluation of a [`FeQ1`] element under a quadrature rule
#[derive(Debug, Clone)]
pub struct CellValues {
    fe: FeQ1,
    quadrature: QuadratureRule,
    ref_values: Vec<[f64; 4]>,
    ref_gradients: Vec<[[f64; 2]; 4]>,
    gradients: Vec<[[f64; 2]; 4]>,
    jxw: Vec<f64>,
}

impl CellValues {
    pub fn new(fe: FeQ1, quadrature: QuadratureRule) -> Self {
        let ref_values: Vec<_> = quadrature
            .iter()
            .map(|q| fe.shape_values(q.xi(), q.eta()))
            .collect();
        let ref_gradients: Vec<_> = quadrature
            .iter()
            .map(|q| fe.shape_gradients(q.xi(), q.eta()))
            .collect();
        let n_q = quadrature.num_points();

        Self {
            fe,
            quadrature,
            ref_values,
            ref_gradients,
            gradients: vec![[[0.0; 2]; 4]; n_q],
            jxw: vec![0.0; n_q],
        }
    }

    /// Recompute physical gradients and `JxW` for a cell with the given
    /// vertex coordinates (counter-clockwise)
    pub fn reinit(&mut self, coords: &[[f64; 2]; 4]) -> Result<(), BasisError> {
        for (q, qp) in self.quadrature.points.iter().enumerate() {
            let jac = Jacobian::from_2d(&self.ref_gradients[q], coords);
            if jac.det.abs() < f64::EPSILON {
                return Err(BasisError::DegenerateCell { det: jac.det });
            }

            for i in 0..FeQ1::DOFS_PER_CELL {
                self.gradients[q][i] = jac.transform_gradient(&self.ref_gradients[q][i]);
            }
            self.jxw[q] = qp.weight * jac.det.abs();
        }
        Ok(())
    }

    pub fn dofs_per_cell(&self) -> usize {
        self.fe.dofs_per_cell()
    }

    /// Number of quadrature points
    pub fn n_q_points(&self) -> usize {
        self.quadrature.num_points()
    }

    /// Value of local basis function `i` at quadrature point `q`
    #[inline]
    pub fn shape_value(&self, i: usize, q: usize) -> f64 {
        self.ref_values[q][i]
    }

    /// Physical gradient of local basis function `i` at quadrature point `q`
    #[inline]
    pub fn shape_grad(&self, i: usize, q: usize) -> [f64; 2] {
        self.gradients[q][i]
    }

    /// Quadrature weight times |det J| at quadrature point `q`
    #[inline]
    pub fn jxw(&self, q: usize) -> f64 {
        self.jxw[q]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> [[f64; 2]; 4] {
        [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
    }

    #[test]
    fn test_jxw_sums_to_area() {
        let mut values = CellValues::new(FeQ1::new(), QuadratureRule::gauss_quadrilateral(2));
        values.reinit(&[[0.0, 0.0], [0.5, 0.0], [0.5, 0.25], [0.0, 0.25]])
            .unwrap();

        let area: f64 = (0..values.n_q_points()).map(|q| values.jxw(q)).sum();
        assert_relative_eq!(area, 0.125, epsilon = 1e-14);
    }

    #[test]
    fn test_unit_square_stiffness_entries() {
        let mut values = CellValues::new(FeQ1::new(), QuadratureRule::gauss_quadrilateral(2));
        values.reinit(&unit_square()).unwrap();

        let entry = |i: usize, j: usize| -> f64 {
            (0..values.n_q_points())
                .map(|q| {
                    let gi = values.shape_grad(i, q);
                    let gj = values.shape_grad(j, q);
                    (gi[0] * gj[0] + gi[1] * gj[1]) * values.jxw(q)
                })
                .sum()
        };

        // Classic Q1 Laplace element matrix on a square
        assert_relative_eq!(entry(0, 0), 2.0 / 3.0, epsilon = 1e-14);
        assert_relative_eq!(entry(0, 1), -1.0 / 6.0, epsilon = 1e-14);
        assert_relative_eq!(entry(0, 2), -1.0 / 3.0, epsilon = 1e-14);
        assert_relative_eq!(entry(0, 3), -1.0 / 6.0, epsilon = 1e-14);
    }

    #[test]
    fn test_degenerate_cell_is_rejected() {
        let mut values = CellValues::new(FeQ1::new(), QuadratureRule::gauss_quadrilateral(2));
        let err = values
            .reinit(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0]])
            .unwrap_err();
        assert!(matches!(err, BasisError::DegenerateCell { .. }));
    }
}
