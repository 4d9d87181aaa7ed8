//! Lagrange basis functions on the reference quadrilateral
//!
//! Only the bilinear (Q1) element is provided. Local node `i` sits on the
//! reference vertex listed in [`FeQ1::REFERENCE_VERTICES`], counter-clockwise
//! from (-1, -1).

/// Evaluate Q1 quadrilateral basis functions at (xi, eta)
/// Reference quad: [-1,1]^2
pub fn q1_quadrilateral(xi: f64, eta: f64) -> [f64; 4] {
    [
        0.25 * (1.0 - xi) * (1.0 - eta),
        0.25 * (1.0 + xi) * (1.0 - eta),
        0.25 * (1.0 + xi) * (1.0 + eta),
        0.25 * (1.0 - xi) * (1.0 + eta),
    ]
}

/// Evaluate Q1 quadrilateral basis function gradients at (xi, eta)
pub fn q1_quadrilateral_grad(xi: f64, eta: f64) -> [[f64; 2]; 4] {
    [
        [-0.25 * (1.0 - eta), -0.25 * (1.0 - xi)],
        [0.25 * (1.0 - eta), -0.25 * (1.0 + xi)],
        [0.25 * (1.0 + eta), 0.25 * (1.0 + xi)],
        [-0.25 * (1.0 + eta), 0.25 * (1.0 - xi)],
    ]
}

/// Bilinear Lagrange element with one degree of freedom per vertex
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeQ1;

impl FeQ1 {
    /// Local degrees of freedom per cell
    pub const DOFS_PER_CELL: usize = 4;

    /// Reference coordinates of the local nodes
    pub const REFERENCE_VERTICES: [[f64; 2]; 4] =
        [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

    pub fn new() -> Self {
        Self
    }

    /// Polynomial degree
    pub fn degree(&self) -> usize {
        1
    }

    pub fn dofs_per_cell(&self) -> usize {
        Self::DOFS_PER_CELL
    }

    /// Values of all local basis functions at a reference point
    pub fn shape_values(&self, xi: f64, eta: f64) -> [f64; 4] {
        q1_quadrilateral(xi, eta)
    }

    /// Reference gradients of all local basis functions at a reference point
    pub fn shape_gradients(&self, xi: f64, eta: f64) -> [[f64; 2]; 4] {
        q1_quadrilateral_grad(xi, eta)
    }
}

impl std::fmt::Display for FeQ1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FE_Q<2>(1)")
    }
}
