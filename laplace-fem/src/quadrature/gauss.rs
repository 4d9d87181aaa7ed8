//! Gauss-Legendre quadrature points and weights
//!
//! Points on [-1, 1] are the roots of the Legendre polynomial P_n, found by
//! Newton iteration from the Chebyshev-like initial guess
//! `cos(π (i + 3/4) / (n + 1/2))`. Quadrilateral rules are tensor products.

use std::f64::consts::PI;

/// A single quadrature point with weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraturePoint {
    /// Reference coordinates (xi, eta)
    pub coords: [f64; 2],
    /// Integration weight
    pub weight: f64,
}

impl QuadraturePoint {
    pub fn new_1d(xi: f64, weight: f64) -> Self {
        Self {
            coords: [xi, 0.0],
            weight,
        }
    }

    pub fn new_2d(xi: f64, eta: f64, weight: f64) -> Self {
        Self {
            coords: [xi, eta],
            weight,
        }
    }

    #[inline]
    pub fn xi(&self) -> f64 {
        self.coords[0]
    }

    #[inline]
    pub fn eta(&self) -> f64 {
        self.coords[1]
    }
}

/// Evaluate P_n(x) and P_n'(x) with the three-term recurrence
fn legendre_with_derivative(n: usize, x: f64) -> (f64, f64) {
    let mut p_prev = 1.0;
    let mut p = x;
    for k in 2..=n {
        let k = k as f64;
        let p_next = ((2.0 * k - 1.0) * x * p - (k - 1.0) * p_prev) / k;
        p_prev = p;
        p = p_next;
    }
    if n == 0 {
        return (1.0, 0.0);
    }
    let dp = n as f64 * (x * p - p_prev) / (x * x - 1.0);
    (p, dp)
}

/// 1D Gauss-Legendre quadrature on [-1, 1] with `n_points` points
///
/// Exact for polynomials up to degree `2 * n_points - 1`. Points are returned
/// in ascending order.
///
/// # Panics
///
/// Panics if `n_points` is zero.
pub fn gauss_legendre_1d(n_points: usize) -> Vec<QuadraturePoint> {
    assert!(n_points > 0, "Gauss rule needs at least one point");

    if n_points == 1 {
        return vec![QuadraturePoint::new_1d(0.0, 2.0)];
    }

    let n = n_points as f64;
    let mut points = Vec::with_capacity(n_points);

    for i in 0..n_points {
        let mut x = (PI * (i as f64 + 0.75) / (n + 0.5)).cos();
        for _ in 0..100 {
            let (p, dp) = legendre_with_derivative(n_points, x);
            let dx = p / dp;
            x -= dx;
            if dx.abs() < 1e-15 {
                break;
            }
        }
        let (_, dp) = legendre_with_derivative(n_points, x);
        let weight = 2.0 / ((1.0 - x * x) * dp * dp);
        points.push(QuadraturePoint::new_1d(x, weight));
    }

    points.reverse();
    points
}

/// Tensor-product Gauss rule on the reference quadrilateral [-1,1]²
///
/// `n_points` is the number of points per direction. Points are ordered with
/// xi running fastest.
pub fn gauss_quadrilateral(n_points: usize) -> Vec<QuadraturePoint> {
    let pts_1d = gauss_legendre_1d(n_points);
    let mut result = Vec::with_capacity(pts_1d.len() * pts_1d.len());

    for pj in &pts_1d {
        for pi in &pts_1d {
            result.push(QuadraturePoint::new_2d(
                pi.xi(),
                pj.xi(),
                pi.weight * pj.weight,
            ));
        }
    }

    result
}
