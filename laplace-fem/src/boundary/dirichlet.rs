//! Dirichlet (essential) boundary conditions
//!
//! Implements u = g on the boundary by eliminating the constrained rows and
//! columns from an assembled system.

use super::BoundaryError;
use crate::dofs::VertexDofs;
use crate::mesh::{BoundaryId, Point, Triangulation};
use ndarray::Array1;
use solvers::CsrMatrix;
use std::collections::BTreeMap;

/// Boundary values keyed by global DoF, iterated in index order
pub type BoundaryValues = BTreeMap<usize, f64>;

/// Collect every DoF on a face carrying `boundary_id`, valued by `g` at the
/// DoF's support point
pub fn interpolate_boundary_values<D, F>(
    mesh: &Triangulation,
    dofs: &D,
    boundary_id: BoundaryId,
    g: F,
) -> Result<BoundaryValues, BoundaryError>
where
    D: VertexDofs + ?Sized,
    F: Fn(Point) -> f64,
{
    let mut values = BoundaryValues::new();

    for (_, cell) in mesh.active_cells().filter(|(_, c)| c.at_boundary()) {
        for face in 0..4 {
            if cell.boundary[face] != Some(boundary_id) {
                continue;
            }
            for vertex in cell.face_vertices(face) {
                let dof = dofs
                    .vertex_dof(vertex)
                    .ok_or(BoundaryError::UnnumberedVertex { vertex })?;
                values
                    .entry(dof)
                    .or_insert_with(|| g(dofs.dof_support_point(dof)));
            }
        }
    }

    log::debug!(
        "Interpolated {} boundary values on boundary {} ({} DoFs total)",
        values.len(),
        boundary_id,
        dofs.n_dofs()
    );

    Ok(values)
}

/// Eliminate constrained DoFs from `matrix`, keeping it symmetric
///
/// For each constrained DoF i with value v:
/// - b[j] -= A[j, i] * v and A[j, i] = 0 for every other row j
/// - A[i, :] = 0, A[i, i] = 1
/// - b[i] = v, x[i] = v
///
/// The matrix pattern must be structurally symmetric with every diagonal
/// entry present. Applying the same values twice leaves the system unchanged.
pub fn apply_boundary_values(
    boundary_values: &BoundaryValues,
    matrix: &mut CsrMatrix<f64>,
    solution: &mut Array1<f64>,
    rhs: &mut Array1<f64>,
) -> Result<(), BoundaryError> {
    let n = matrix.num_rows;
    if solution.len() != n || rhs.len() != n {
        return Err(BoundaryError::DimensionMismatch {
            expected: n,
            actual: if solution.len() != n {
                solution.len()
            } else {
                rhs.len()
            },
        });
    }

    for (&i, &value) in boundary_values {
        if i >= n {
            return Err(BoundaryError::DofOutOfRange { dof: i, n_dofs: n });
        }

        for pos in matrix.row_range(i) {
            let j = matrix.col_indices[pos];
            if j == i {
                continue;
            }
            // Column entry A[j, i] sits in row j
            if let Some(col_pos) = matrix.position(j, i) {
                rhs[j] -= matrix.values[col_pos] * value;
                matrix.values[col_pos] = 0.0;
            }
            matrix.values[pos] = 0.0;
        }

        matrix.set(i, i, 1.0)?;
        rhs[i] = value;
        solution[i] = value;
    }

    Ok(())
}
