//! Quadrature rules on the reference quadrilateral

use super::gauss::{QuadraturePoint, gauss_quadrilateral};

/// Quadrature rule on [-1,1]²
#[derive(Debug, Clone)]
pub struct QuadratureRule {
    /// Points per coordinate direction
    pub n_points_1d: usize,
    /// Quadrature points and weights
    pub points: Vec<QuadraturePoint>,
}

impl QuadratureRule {
    /// Tensor-product Gauss rule with `n_points_1d` points per direction
    ///
    /// Exact for polynomials of degree `2 * n_points_1d - 1` in each variable.
    pub fn gauss_quadrilateral(n_points_1d: usize) -> Self {
        Self {
            n_points_1d,
            points: gauss_quadrilateral(n_points_1d),
        }
    }

    /// Number of quadrature points
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Iterator over quadrature points
    pub fn iter(&self) -> impl Iterator<Item = &QuadraturePoint> {
        self.points.iter()
    }
}

/// Points per direction needed to integrate a Q_p stiffness matrix exactly
/// on affine cells
///
/// The integrand grad(phi_i) . grad(phi_j) has degree 2p in each variable,
/// and n Gauss points integrate degree 2n - 1, so n = p + 1.
pub fn required_points_for_stiffness(polynomial_degree: usize) -> usize {
    polynomial_degree + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrature_rule_creation() {
        let rule = QuadratureRule::gauss_quadrilateral(2);
        assert_eq!(rule.n_points_1d, 2);
        assert_eq!(rule.num_points(), 4);
    }

    #[test]
    fn test_required_points() {
        assert_eq!(required_points_for_stiffness(1), 2);
        assert_eq!(required_points_for_stiffness(2), 3);
    }

    #[test]
    fn test_rule_integrates_bilinear_products() {
        // ∫∫ (1 + xi)^2 (1 - eta)^2 over [-1,1]^2 = (8/3)^2
        let rule = QuadratureRule::gauss_quadrilateral(2);
        let integral: f64 = rule
            .iter()
            .map(|q| (1.0 + q.xi()).powi(2) * (1.0 - q.eta()).powi(2) * q.weight)
            .sum();
        assert!((integral - 64.0 / 9.0).abs() < 1e-13);
    }
}
