//! Degree of freedom numbering
//!
//! Q1 elements carry one DoF per vertex. The global (active) numbering covers
//! the vertices of active cells; each level has its own numbering over the
//! vertices of the cells on that level. Both number vertices in order of first
//! appearance while walking the cells.
//!
//! Consumers only see the capability traits [`ActiveDofs`], [`VertexDofs`]
//! and [`LevelDofs`]; [`DofHandler`] implements all three.

mod tools;

pub use tools::*;

use crate::basis::FeQ1;
use crate::mesh::{Cell, Point, Triangulation};
use thiserror::Error;

/// Errors raised by DoF distribution and lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DofError {
    #[error("cannot distribute degrees of freedom on an empty mesh")]
    EmptyMesh,

    #[error("vertex {vertex} carries no degree of freedom in this numbering")]
    UnnumberedVertex { vertex: usize },

    #[error("level {level} does not exist (mesh has {n_levels} levels)")]
    InvalidLevel { level: usize, n_levels: usize },
}

/// Global numbering over active cells
pub trait ActiveDofs {
    /// Total number of global degrees of freedom
    fn n_dofs(&self) -> usize;

    /// Global indices of an active cell's DoFs, in local (vertex) order
    ///
    /// `indices` is cleared first.
    fn cell_dof_indices(&self, cell: &Cell, indices: &mut Vec<usize>) -> Result<(), DofError>;
}

/// Geometric view of the global numbering, needed to interpolate boundary data
pub trait VertexDofs: ActiveDofs {
    /// Global DoF living on a vertex, if the vertex belongs to an active cell
    fn vertex_dof(&self, vertex: usize) -> Option<usize>;

    /// Location of a global DoF
    fn dof_support_point(&self, dof: usize) -> Point;
}

/// Level-local numbering over all cells of each level
pub trait LevelDofs {
    fn n_levels(&self) -> usize;

    /// Number of DoFs on `level`, or 0 if the level does not exist
    fn n_level_dofs(&self, level: usize) -> usize;

    /// Level-local indices of a cell's DoFs, on the cell's own level
    ///
    /// `indices` is cleared first.
    fn level_cell_dof_indices(&self, cell: &Cell, indices: &mut Vec<usize>)
    -> Result<(), DofError>;
}

/// Vertex-to-DoF map built by first appearance
#[derive(Debug, Clone, Default)]
pub struct VertexNumbering {
    vertex_to_dof: Vec<Option<usize>>,
    dof_to_vertex: Vec<usize>,
}

impl VertexNumbering {
    /// Number the vertices of `cells` in traversal order
    pub fn from_cells<'a, I>(n_vertices: usize, cells: I) -> Self
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let mut vertex_to_dof = vec![None; n_vertices];
        let mut dof_to_vertex = Vec::new();

        for cell in cells {
            for &v in &cell.vertices {
                if vertex_to_dof[v].is_none() {
                    vertex_to_dof[v] = Some(dof_to_vertex.len());
                    dof_to_vertex.push(v);
                }
            }
        }

        Self {
            vertex_to_dof,
            dof_to_vertex,
        }
    }

    pub fn n_dofs(&self) -> usize {
        self.dof_to_vertex.len()
    }

    pub fn vertex_dof(&self, vertex: usize) -> Option<usize> {
        self.vertex_to_dof.get(vertex).copied().flatten()
    }

    pub fn dof_vertex(&self, dof: usize) -> usize {
        self.dof_to_vertex[dof]
    }

    /// Indices of a cell's vertices
    pub fn cell_indices(&self, cell: &Cell, indices: &mut Vec<usize>) -> Result<(), DofError> {
        indices.clear();
        for &vertex in &cell.vertices {
            let dof = self
                .vertex_dof(vertex)
                .ok_or(DofError::UnnumberedVertex { vertex })?;
            indices.push(dof);
        }
        Ok(())
    }
}

/// DoF handler for a [`FeQ1`] element on a multilevel triangulation
#[derive(Debug, Clone)]
pub struct DofHandler {
    fe: FeQ1,
    active: VertexNumbering,
    levels: Vec<VertexNumbering>,
    support_points: Vec<Point>,
}

impl DofHandler {
    /// Number global DoFs on the active cells and level DoFs on every level
    pub fn distribute(mesh: &Triangulation, fe: FeQ1) -> Result<Self, DofError> {
        if mesh.is_empty() {
            return Err(DofError::EmptyMesh);
        }

        let n_vertices = mesh.n_vertices();
        let active = VertexNumbering::from_cells(n_vertices, mesh.active_cells().map(|(_, c)| c));
        let levels: Vec<_> = (0..mesh.n_levels())
            .map(|level| VertexNumbering::from_cells(n_vertices, mesh.cells_on_level(level)))
            .collect();

        let support_points = (0..active.n_dofs())
            .map(|dof| mesh.vertex(active.dof_vertex(dof)))
            .collect();

        log::debug!(
            "Distributed {} DoFs for {} ({} levels)",
            active.n_dofs(),
            fe,
            levels.len()
        );

        Ok(Self {
            fe,
            active,
            levels,
            support_points,
        })
    }

    /// DoF counts of all levels, coarsest first
    pub fn level_dof_counts(&self) -> Vec<usize> {
        self.levels.iter().map(VertexNumbering::n_dofs).collect()
    }

    /// The numbering of one level
    pub fn level_numbering(&self, level: usize) -> Result<&VertexNumbering, DofError> {
        self.levels.get(level).ok_or(DofError::InvalidLevel {
            level,
            n_levels: self.levels.len(),
        })
    }
}

impl ActiveDofs for DofHandler {
    fn n_dofs(&self) -> usize {
        self.active.n_dofs()
    }

    fn cell_dof_indices(&self, cell: &Cell, indices: &mut Vec<usize>) -> Result<(), DofError> {
        self.active.cell_indices(cell, indices)
    }
}

impl VertexDofs for DofHandler {
    fn vertex_dof(&self, vertex: usize) -> Option<usize> {
        self.active.vertex_dof(vertex)
    }

    fn dof_support_point(&self, dof: usize) -> Point {
        self.support_points[dof]
    }
}

impl LevelDofs for DofHandler {
    fn n_levels(&self) -> usize {
        self.levels.len()
    }

    fn n_level_dofs(&self, level: usize) -> usize {
        self.levels.get(level).map_or(0, VertexNumbering::n_dofs)
    }

    fn level_cell_dof_indices(
        &self,
        cell: &Cell,
        indices: &mut Vec<usize>,
    ) -> Result<(), DofError> {
        self.level_numbering(cell.level)?.cell_indices(cell, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::CellId;

    fn refined_square(times: usize) -> Triangulation {
        let mut tria = Triangulation::hyper_cube(0.0, 1.0).unwrap();
        tria.refine_global(times).unwrap();
        tria
    }

    #[test]
    fn test_single_cell_numbering() {
        let tria = refined_square(0);
        let dofs = DofHandler::distribute(&tria, FeQ1::new()).unwrap();

        let mut indices = Vec::new();
        dofs.cell_dof_indices(tria.cell(CellId::new(0, 0)), &mut indices)
            .unwrap();

        assert_eq!(dofs.n_dofs(), 4);
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(dofs.dof_support_point(2), Point::new(1.0, 1.0));
    }

    #[test]
    fn test_level_dof_counts() {
        let tria = refined_square(3);
        let dofs = DofHandler::distribute(&tria, FeQ1::new()).unwrap();

        assert_eq!(dofs.n_levels(), 4);
        assert_eq!(dofs.level_dof_counts(), vec![4, 9, 25, 81]);
        assert_eq!(dofs.n_dofs(), 81);
        assert_eq!(dofs.n_level_dofs(7), 0);
    }

    #[test]
    fn test_numbering_is_first_appearance() {
        let tria = refined_square(1);
        let dofs = DofHandler::distribute(&tria, FeQ1::new()).unwrap();

        let mut seen = 0;
        let mut indices = Vec::new();
        for (_, cell) in tria.active_cells() {
            dofs.cell_dof_indices(cell, &mut indices).unwrap();
            for &i in &indices {
                assert!(i <= seen);
                if i == seen {
                    seen += 1;
                }
            }
        }
        assert_eq!(seen, dofs.n_dofs());
    }

    #[test]
    fn test_coarse_cell_level_numbering() {
        let tria = refined_square(1);
        let dofs = DofHandler::distribute(&tria, FeQ1::new()).unwrap();

        // Level 0 vertices are still active DoFs, and level 0 is numbered on its own
        let coarse = tria.cell(CellId::new(0, 0));
        let mut indices = Vec::new();
        dofs.level_cell_dof_indices(coarse, &mut indices).unwrap();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(dofs.cell_dof_indices(coarse, &mut indices).is_ok());
    }

    #[test]
    fn test_empty_mesh() {
        let tria = Triangulation::new();
        assert_eq!(
            DofHandler::distribute(&tria, FeQ1::new()).unwrap_err(),
            DofError::EmptyMesh
        );
    }
}
