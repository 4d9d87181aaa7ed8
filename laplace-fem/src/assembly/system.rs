//! Global system assembly over active cells

use super::{AssemblyError, cell_load, cell_stiffness};
use crate::basis::CellValues;
use crate::dofs::ActiveDofs;
use crate::mesh::Triangulation;
use ndarray::{Array1, Array2};
use solvers::CsrMatrix;

/// Add the Laplace matrix and the load vector for a constant source into
/// `matrix` and `rhs`
///
/// Contributions are added to the existing values, so the caller resets them
/// between assemblies. `matrix` must already carry the sparsity pattern of
/// `dofs`.
pub fn assemble_system<D: ActiveDofs>(
    mesh: &Triangulation,
    dofs: &D,
    values: &mut CellValues,
    source: f64,
    matrix: &mut CsrMatrix<f64>,
    rhs: &mut Array1<f64>,
) -> Result<(), AssemblyError> {
    let n_dofs = dofs.n_dofs();
    check_dimension(n_dofs, matrix.num_rows)?;
    check_dimension(n_dofs, rhs.len())?;

    let dofs_per_cell = values.dofs_per_cell();
    let mut cell_matrix = Array2::zeros((dofs_per_cell, dofs_per_cell));
    let mut cell_rhs = Array1::zeros(dofs_per_cell);
    let mut local_dof_indices = Vec::with_capacity(dofs_per_cell);

    for (id, cell) in mesh.active_cells() {
        values.reinit(&mesh.cell_coords(id))?;

        cell_stiffness(values, &mut cell_matrix);
        cell_load(values, source, &mut cell_rhs);

        dofs.cell_dof_indices(cell, &mut local_dof_indices)?;
        check_dimension(dofs_per_cell, local_dof_indices.len())?;

        matrix.add_local(&local_dof_indices, &cell_matrix)?;
        for (i, &gi) in local_dof_indices.iter().enumerate() {
            rhs[gi] += cell_rhs[i];
        }
    }

    Ok(())
}

pub(crate) fn check_dimension(expected: usize, actual: usize) -> Result<(), AssemblyError> {
    if expected == actual {
        Ok(())
    } else {
        Err(AssemblyError::DimensionMismatch { expected, actual })
    }
}
