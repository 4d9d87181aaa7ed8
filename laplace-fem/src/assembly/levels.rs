//! Level matrices for the multilevel hierarchy
//!
//! Every cell of every level contributes its stiffness matrix to the matrix of
//! its own level, in that level's DoF numbering. No load vector and no
//! boundary elimination are applied here.

use super::system::check_dimension;
use super::{AssemblyError, cell_stiffness};
use crate::basis::CellValues;
use crate::dofs::LevelDofs;
use crate::mesh::Triangulation;
use ndarray::Array2;
use solvers::{CsrMatrix, Scalar};
use std::ops::{Index, IndexMut};

/// One object per mesh level, addressed by level number
#[derive(Debug, Clone, PartialEq)]
pub struct LevelObject<T> {
    objects: Vec<T>,
}

impl<T> LevelObject<T> {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Build one object per level from `make(level)`
    pub fn from_fn(n_levels: usize, make: impl FnMut(usize) -> T) -> Self {
        Self {
            objects: (0..n_levels).map(make).collect(),
        }
    }

    /// Replace the contents with one object per level
    pub fn resize_with(&mut self, n_levels: usize, make: impl FnMut(usize) -> T) {
        self.objects = (0..n_levels).map(make).collect();
    }

    /// Number of levels held
    pub fn n_levels(&self) -> usize {
        self.objects.len()
    }

    pub fn get_mut(&mut self, level: usize) -> Option<&mut T> {
        self.objects.get_mut(level)
    }

    /// Finest level object
    pub fn last(&self) -> Option<&T> {
        self.objects.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.objects.iter_mut()
    }
}

impl<T> Default for LevelObject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for LevelObject<T> {
    type Output = T;

    fn index(&self, level: usize) -> &T {
        &self.objects[level]
    }
}

impl<T> IndexMut<usize> for LevelObject<T> {
    fn index_mut(&mut self, level: usize) -> &mut T {
        &mut self.objects[level]
    }
}

/// Add the stiffness matrix of every cell into the matrix of its level
///
/// Local blocks are integrated in `f64` and converted to the storage scalar
/// `T` at scatter time. Each level matrix must already carry that level's
/// sparsity pattern and is added into, not overwritten.
pub fn assemble_multigrid<D, T>(
    mesh: &Triangulation,
    dofs: &D,
    values: &mut CellValues,
    level_matrices: &mut LevelObject<CsrMatrix<T>>,
) -> Result<(), AssemblyError>
where
    D: LevelDofs,
    T: Scalar,
{
    check_dimension(mesh.n_levels(), level_matrices.n_levels())?;
    for level in 0..level_matrices.n_levels() {
        check_dimension(dofs.n_level_dofs(level), level_matrices[level].num_rows)?;
    }

    let dofs_per_cell = values.dofs_per_cell();
    let mut cell_matrix = Array2::zeros((dofs_per_cell, dofs_per_cell));
    let mut local_dof_indices = Vec::with_capacity(dofs_per_cell);

    for (id, cell) in mesh.cells() {
        values.reinit(&mesh.cell_coords(id))?;
        cell_stiffness(values, &mut cell_matrix);

        dofs.level_cell_dof_indices(cell, &mut local_dof_indices)?;
        check_dimension(dofs_per_cell, local_dof_indices.len())?;

        let n_levels = level_matrices.n_levels();
        let matrix = level_matrices
            .get_mut(cell.level)
            .ok_or(AssemblyError::MissingLevel {
                level: cell.level,
                n_levels,
            })?;
        matrix.add_local(&local_dof_indices, &cell_matrix.mapv(T::from_f64_lossy))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::FeQ1;
    use crate::dofs::{DofError, DofHandler, make_level_sparsity_pattern};
    use crate::mesh::Cell;
    use crate::quadrature::QuadratureRule;

    /// Level numbering that drops the last vertex of every cell
    struct TruncatedLevelDofs;

    impl LevelDofs for TruncatedLevelDofs {
        fn n_levels(&self) -> usize {
            1
        }

        fn n_level_dofs(&self, _level: usize) -> usize {
            4
        }

        fn level_cell_dof_indices(
            &self,
            cell: &Cell,
            indices: &mut Vec<usize>,
        ) -> Result<(), DofError> {
            indices.clear();
            indices.extend_from_slice(&cell.vertices[..3]);
            Ok(())
        }
    }

    fn level_matrices(
        tria: &Triangulation,
        dofs: &DofHandler,
    ) -> LevelObject<CsrMatrix<f32>> {
        LevelObject::from_fn(tria.n_levels(), |level| {
            CsrMatrix::from_pattern(&make_level_sparsity_pattern(tria, dofs, level).unwrap())
        })
    }

    #[test]
    fn test_level_object_indexing() {
        let mut levels = LevelObject::from_fn(3, |l| l * 10);
        levels[1] += 5;

        assert_eq!(levels.n_levels(), 3);
        assert_eq!(levels[1], 15);
        assert_eq!(levels.last(), Some(&20));
        assert_eq!(levels.get_mut(3), None);

        levels.resize_with(1, |_| 7);
        assert_eq!(levels.iter().copied().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_level_matrix_sizes() {
        let mut tria = Triangulation::hyper_cube(0.0, 1.0).unwrap();
        tria.refine_global(3).unwrap();
        let dofs = DofHandler::distribute(&tria, FeQ1::new()).unwrap();
        let mut matrices = level_matrices(&tria, &dofs);
        let mut values = CellValues::new(FeQ1::new(), QuadratureRule::gauss_quadrilateral(2));

        assemble_multigrid(&tria, &dofs, &mut values, &mut matrices).unwrap();

        for level in 0..4 {
            let n = (1usize << level) + 1;
            assert_eq!(matrices[level].num_rows, n * n);
            assert!(matrices[level].is_symmetric(1e-6));
        }
    }

    #[test]
    fn test_level_zero_is_single_cell_matrix() {
        let mut tria = Triangulation::hyper_cube(0.0, 1.0).unwrap();
        tria.refine_global(1).unwrap();
        let dofs = DofHandler::distribute(&tria, FeQ1::new()).unwrap();
        let mut matrices = level_matrices(&tria, &dofs);
        let mut values = CellValues::new(FeQ1::new(), QuadratureRule::gauss_quadrilateral(2));

        assemble_multigrid(&tria, &dofs, &mut values, &mut matrices).unwrap();

        let coarse = &matrices[0];
        assert!((coarse.get(0, 0) - 2.0 / 3.0).abs() < 1e-6);
        assert!((coarse.get(0, 1) + 1.0 / 6.0).abs() < 1e-6);
        assert!((coarse.get(0, 2) + 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_short_cell_indices_are_rejected() {
        let tria = Triangulation::hyper_cube(0.0, 1.0).unwrap();
        let dofs = DofHandler::distribute(&tria, FeQ1::new()).unwrap();
        let mut matrices = level_matrices(&tria, &dofs);
        let untouched = matrices.clone();
        let mut values = CellValues::new(FeQ1::new(), QuadratureRule::gauss_quadrilateral(2));

        let err =
            assemble_multigrid(&tria, &TruncatedLevelDofs, &mut values, &mut matrices).unwrap_err();

        assert_eq!(
            err,
            AssemblyError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(matrices, untouched);
    }

    #[test]
    fn test_missing_level_matrices_are_rejected() {
        let mut tria = Triangulation::hyper_cube(0.0, 1.0).unwrap();
        tria.refine_global(1).unwrap();
        let dofs = DofHandler::distribute(&tria, FeQ1::new()).unwrap();
        let mut values = CellValues::new(FeQ1::new(), QuadratureRule::gauss_quadrilateral(2));
        let mut too_few: LevelObject<CsrMatrix<f32>> = LevelObject::new();

        let err = assemble_multigrid(&tria, &dofs, &mut values, &mut too_few).unwrap_err();
        assert_eq!(
            err,
            AssemblyError::DimensionMismatch {
                expected: 2,
                actual: 0
            }
        );
    }
}
