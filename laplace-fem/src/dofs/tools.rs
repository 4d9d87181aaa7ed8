//! Sparsity pattern construction from a DoF numbering

use super::{ActiveDofs, DofError, LevelDofs};
use crate::mesh::Triangulation;
use solvers::{DynamicSparsityPattern, SparsityPattern};

/// Couple all global DoFs that share an active cell
pub fn make_sparsity_pattern<D: ActiveDofs>(
    mesh: &Triangulation,
    dofs: &D,
) -> Result<SparsityPattern, DofError> {
    let n = dofs.n_dofs();
    let mut dsp = DynamicSparsityPattern::new(n, n);
    let mut indices = Vec::new();

    for (_, cell) in mesh.active_cells() {
        dofs.cell_dof_indices(cell, &mut indices)?;
        dsp.add_block(&indices);
    }

    Ok(dsp.compress())
}

/// Couple all level DoFs that share a cell on `level`
pub fn make_level_sparsity_pattern<D: LevelDofs>(
    mesh: &Triangulation,
    dofs: &D,
    level: usize,
) -> Result<SparsityPattern, DofError> {
    if level >= dofs.n_levels() {
        return Err(DofError::InvalidLevel {
            level,
            n_levels: dofs.n_levels(),
        });
    }

    let n = dofs.n_level_dofs(level);
    let mut dsp = DynamicSparsityPattern::new(n, n);
    let mut indices = Vec::new();

    for cell in mesh.cells_on_level(level) {
        dofs.level_cell_dof_indices(cell, &mut indices)?;
        dsp.add_block(&indices);
    }

    Ok(dsp.compress())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::FeQ1;
    use crate::dofs::DofHandler;

    #[test]
    fn test_single_cell_pattern_is_full() {
        let tria = Triangulation::hyper_cube(0.0, 1.0).unwrap();
        let dofs = DofHandler::distribute(&tria, FeQ1::new()).unwrap();
        let sp = make_sparsity_pattern(&tria, &dofs).unwrap();

        assert_eq!(sp.num_rows(), 4);
        assert_eq!(sp.nnz(), 16);
    }

    #[test]
    fn test_refined_pattern() {
        let mut tria = Triangulation::hyper_cube(0.0, 1.0).unwrap();
        tria.refine_global(1).unwrap();
        let dofs = DofHandler::distribute(&tria, FeQ1::new()).unwrap();
        let sp = make_sparsity_pattern(&tria, &dofs).unwrap();

        // 3x3 vertex grid: corners couple to 4, edges to 6, centre to 9
        assert_eq!(sp.nnz(), 4 * 4 + 4 * 6 + 9);
        assert_eq!(sp.max_row_length(), 9);
        assert!(sp.is_symmetric());
    }

    #[test]
    fn test_level_patterns() {
        let mut tria = Triangulation::hyper_cube(0.0, 1.0).unwrap();
        tria.refine_global(2).unwrap();
        let dofs = DofHandler::distribute(&tria, FeQ1::new()).unwrap();

        let coarse = make_level_sparsity_pattern(&tria, &dofs, 0).unwrap();
        let fine = make_level_sparsity_pattern(&tria, &dofs, 2).unwrap();
        let global = make_sparsity_pattern(&tria, &dofs).unwrap();

        assert_eq!(coarse.nnz(), 16);
        assert_eq!(fine.num_rows(), 25);
        assert_eq!(fine.nnz(), global.nnz());
        assert!(matches!(
            make_level_sparsity_pattern(&tria, &dofs, 3),
            Err(DofError::InvalidLevel { .. })
        ));
    }
}
