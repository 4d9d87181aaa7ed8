//! Cell-local integrals

use crate::basis::CellValues;
use ndarray::{Array1, Array2};

/// Local Laplace matrix: K_ij = Σ_q ∇φ_i(q) · ∇φ_j(q) JxW(q)
///
/// `local` is overwritten.
pub fn cell_stiffness(values: &CellValues, local: &mut Array2<f64>) {
    let n = values.dofs_per_cell();
    local.fill(0.0);

    for q in 0..values.n_q_points() {
        let jxw = values.jxw(q);
        for i in 0..n {
            let gi = values.shape_grad(i, q);
            for j in 0..n {
                let gj = values.shape_grad(j, q);
                local[[i, j]] += (gi[0] * gj[0] + gi[1] * gj[1]) * jxw;
            }
        }
    }
}

/// Local load vector: F_i = Σ_q φ_i(q) f JxW(q)
///
/// `local` is overwritten.
pub fn cell_load(values: &CellValues, source: f64, local: &mut Array1<f64>) {
    let n = values.dofs_per_cell();
    local.fill(0.0);

    for q in 0..values.n_q_points() {
        let jxw = values.jxw(q);
        for i in 0..n {
            local[i] += values.shape_value(i, q) * source * jxw;
        }
    }
}
