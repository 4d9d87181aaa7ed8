//! Hierarchical quadrilateral mesh
//!
//! A [`Triangulation`] stores one vector of cells per refinement level. Level 0
//! holds the coarse cells; refining a cell appends its four children to the
//! next level. Cells that have no children are *active*.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boundary indicator attached to a cell face
pub type BoundaryId = u32;

/// Errors raised when building or refining a mesh
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("triangulation has no cells")]
    Empty,

    #[error("invalid domain [{left}, {right}]: left bound must be smaller than right")]
    InvalidDomain { left: f64, right: f64 },
}

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between two points
    pub fn midpoint(&self, other: &Point) -> Point {
        Point {
            x: 0.5 * (self.x + other.x),
            y: 0.5 * (self.y + other.y),
        }
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Address of a cell: its level and its position within that level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId {
    pub level: usize,
    pub index: usize,
}

impl CellId {
    pub fn new(level: usize, index: usize) -> Self {
        Self { level, index }
    }
}

/// A quadrilateral cell
///
/// Vertices are counter-clockwise. Face `k` joins vertex `k` and vertex
/// `(k + 1) % 4`: face 0 is the bottom edge, then right, top, left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Global vertex indices
    pub vertices: [usize; 4],
    /// Refinement level
    pub level: usize,
    /// Parent cell (None on level 0)
    pub parent: Option<CellId>,
    /// Children, once the cell has been refined
    pub children: Option<[CellId; 4]>,
    /// Boundary indicator per face; interior faces carry None
    pub boundary: [Option<BoundaryId>; 4],
}

impl Cell {
    /// Create a coarse cell
    pub fn new(vertices: [usize; 4], boundary: [Option<BoundaryId>; 4]) -> Self {
        Self {
            vertices,
            level: 0,
            parent: None,
            children: None,
            boundary,
        }
    }

    /// A cell is active while it has not been refined
    #[inline]
    pub fn is_active(&self) -> bool {
        self.children.is_none()
    }

    /// Whether any face lies on the boundary
    pub fn at_boundary(&self) -> bool {
        self.boundary.iter().any(Option::is_some)
    }

    /// Vertex indices of face `face`
    #[inline]
    pub fn face_vertices(&self, face: usize) -> [usize; 2] {
        [self.vertices[face], self.vertices[(face + 1) % 4]]
    }
}

/// Multilevel quadrilateral mesh
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Triangulation {
    /// Vertex coordinates, shared by all levels
    pub vertices: Vec<Point>,
    /// Cells per level
    pub levels: Vec<Vec<Cell>>,
}

impl Triangulation {
    /// Create an empty triangulation
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, p: Point) -> usize {
        let idx = self.vertices.len();
        self.vertices.push(p);
        idx
    }

    /// Add a coarse (level 0) cell and return its id
    pub fn add_coarse_cell(&mut self, cell: Cell) -> CellId {
        if self.levels.is_empty() {
            self.levels.push(Vec::new());
        }
        self.levels[0].push(cell);
        CellId::new(0, self.levels[0].len() - 1)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.first().is_none_or(|l| l.is_empty())
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex(&self, idx: usize) -> Point {
        self.vertices[idx]
    }

    /// Number of levels (0 for an empty triangulation)
    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    /// Total number of cells over all levels
    pub fn n_cells(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Number of cells without children
    pub fn n_active_cells(&self) -> usize {
        self.levels
            .iter()
            .flatten()
            .filter(|c| c.is_active())
            .count()
    }

    pub fn cells_on_level(&self, level: usize) -> &[Cell] {
        self.levels.get(level).map_or(&[], Vec::as_slice)
    }

    /// All cells, level by level
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> + '_ {
        self.levels.iter().enumerate().flat_map(|(level, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(index, cell)| (CellId::new(level, index), cell))
        })
    }

    /// Cells without children, in level order
    pub fn active_cells(&self) -> impl Iterator<Item = (CellId, &Cell)> + '_ {
        self.cells().filter(|(_, cell)| cell.is_active())
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.levels[id.level][id.index]
    }

    /// Coordinates of the four vertices of a cell
    pub fn cell_vertices(&self, id: CellId) -> [Point; 4] {
        self.cell(id).vertices.map(|v| self.vertices[v])
    }

    /// Vertex coordinates as plain arrays, as consumed by shape evaluation
    pub fn cell_coords(&self, id: CellId) -> [[f64; 2]; 4] {
        self.cell_vertices(id).map(Point::to_array)
    }
}

#[cfg(test)]
impl Triangulation {
    /// Area of a cell (shoelace formula, exact for straight-edged quads)
    pub(crate) fn cell_measure(&self, id: CellId) -> f64 {
        let p = self.cell_vertices(id);
        let mut twice_area = 0.0;
        for k in 0..4 {
            let a = p[k];
            let b = p[(k + 1) % 4];
            twice_area += a.x * b.y - b.x * a.y;
        }
        0.5 * twice_area.abs()
    }
}
