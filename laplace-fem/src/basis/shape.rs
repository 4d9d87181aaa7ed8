//! Reference-to-physical mapping of bilinear quadrilaterals

/// Jacobian matrix for coordinate transformation
/// Maps reference element coordinates to physical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jacobian {
    /// [[dx/dxi, dx/deta], [dy/dxi, dy/deta]]
    pub matrix: [[f64; 2]; 2],
    /// Determinant of Jacobian
    pub det: f64,
    /// Inverse of Jacobian (for gradient transformation)
    pub inverse: [[f64; 2]; 2],
}

impl Jacobian {
    /// Compute the Jacobian from reference shape gradients and vertex coordinates
    ///
    /// The inverse is only meaningful when `det` is non-zero; callers check
    /// the determinant before transforming gradients.
    pub fn from_2d(grad_ref: &[[f64; 2]; 4], coords: &[[f64; 2]; 4]) -> Self {
        let mut j = [[0.0; 2]; 2];

        for (g, c) in grad_ref.iter().zip(coords.iter()) {
            j[0][0] += g[0] * c[0]; // dx/dxi
            j[0][1] += g[1] * c[0]; // dx/deta
            j[1][0] += g[0] * c[1]; // dy/dxi
            j[1][1] += g[1] * c[1]; // dy/deta
        }

        let det = j[0][0] * j[1][1] - j[0][1] * j[1][0];
        let inv_det = if det != 0.0 { 1.0 / det } else { 0.0 };

        let inverse = [
            [j[1][1] * inv_det, -j[0][1] * inv_det],
            [-j[1][0] * inv_det, j[0][0] * inv_det],
        ];

        Self {
            matrix: j,
            det,
            inverse,
        }
    }

    /// Transform reference gradients to physical gradients
    /// grad_physical = J^{-T} * grad_ref
    pub fn transform_gradient(&self, grad_ref: &[f64; 2]) -> [f64; 2] {
        [
            self.inverse[0][0] * grad_ref[0] + self.inverse[1][0] * grad_ref[1],
            self.inverse[0][1] * grad_ref[0] + self.inverse[1][1] * grad_ref[1],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::q1_quadrilateral_grad;

    #[test]
    fn test_jacobian_reference_square() {
        let coords = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
        let jac = Jacobian::from_2d(&q1_quadrilateral_grad(0.3, 0.1), &coords);

        assert!((jac.matrix[0][0] - 1.0).abs() < 1e-14);
        assert!(jac.matrix[0][1].abs() < 1e-14);
        assert!(jac.matrix[1][0].abs() < 1e-14);
        assert!((jac.det - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_jacobian_unit_square() {
        // [-1,1]^2 -> [0,1]^2 scales by one half in each direction
        let coords = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let jac = Jacobian::from_2d(&q1_quadrilateral_grad(-0.5, 0.5), &coords);

        assert!((jac.matrix[0][0] - 0.5).abs() < 1e-14);
        assert!((jac.matrix[1][1] - 0.5).abs() < 1e-14);
        assert!((jac.det - 0.25).abs() < 1e-14);
    }

    #[test]
    fn test_gradient_transformation() {
        let coords = [[0.0, 0.0], [2.0, 0.0], [2.0, 4.0], [0.0, 4.0]];
        let jac = Jacobian::from_2d(&q1_quadrilateral_grad(0.0, 0.0), &coords);

        // dx/dxi = 1, dy/deta = 2
        let phys = jac.transform_gradient(&[1.0, 1.0]);
        assert!((phys[0] - 1.0).abs() < 1e-14);
        assert!((phys[1] - 0.5).abs() < 1e-14);
    }

    #[test]
    fn test_degenerate_cell_has_zero_determinant() {
        let coords = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0]];
        let jac = Jacobian::from_2d(&q1_quadrilateral_grad(0.0, 0.0), &coords);
        assert_eq!(jac.det, 0.0);
    }
}
