//! Mesh refinement (h-refinement)
//!
//! Isotropic refinement of quadrilaterals: every refined cell gets four
//! children built from its edge midpoints and its centre. Midpoints are shared
//! between neighbours through a cache keyed by edge.

use super::types::{BoundaryId, Cell, CellId, MeshError, Point, Triangulation};
use std::collections::HashMap;

/// Edge represented by sorted vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        if a < b { Edge(a, b) } else { Edge(b, a) }
    }
}

/// Refinement result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefinementResult {
    /// Ids of the cells created
    pub new_cells: Vec<CellId>,
    /// Ids of the cells that were refined
    pub refined_cells: Vec<CellId>,
    /// Indices of new vertices created
    pub new_vertices: Vec<usize>,
}

impl RefinementResult {
    fn merge(&mut self, other: RefinementResult) {
        self.new_cells.extend(other.new_cells);
        self.refined_cells.extend(other.refined_cells);
        self.new_vertices.extend(other.new_vertices);
    }
}

/// Helper struct to manage midpoint creation
struct MidpointManager {
    edge_midpoints: HashMap<Edge, usize>,
    new_vertices: Vec<usize>,
}

impl MidpointManager {
    fn new() -> Self {
        Self {
            edge_midpoints: HashMap::new(),
            new_vertices: Vec::new(),
        }
    }

    fn get_midpoint(&mut self, tria: &mut Triangulation, a: usize, b: usize) -> usize {
        let edge = Edge::new(a, b);
        if let Some(&mid_idx) = self.edge_midpoints.get(&edge) {
            mid_idx
        } else {
            let mid = tria.vertices[a].midpoint(&tria.vertices[b]);
            let idx = tria.add_vertex(mid);
            self.new_vertices.push(idx);
            self.edge_midpoints.insert(edge, idx);
            idx
        }
    }

    fn add_center(&mut self, tria: &mut Triangulation, v: &[usize; 4]) -> usize {
        let (sx, sy) = v.iter().fold((0.0, 0.0), |(sx, sy), &i| {
            (sx + tria.vertices[i].x, sy + tria.vertices[i].y)
        });
        let idx = tria.add_vertex(Point::new(sx / 4.0, sy / 4.0));
        self.new_vertices.push(idx);
        idx
    }
}

/// Boundary indicators of the four children, from the parent's faces
///
/// Child k touches parent faces k and (k + 3) % 4; its other two faces are
/// interior.
fn child_boundaries(parent: &[Option<BoundaryId>; 4]) -> [[Option<BoundaryId>; 4]; 4] {
    let [b0, b1, b2, b3] = *parent;
    [
        [b0, None, None, b3],
        [b0, b1, None, None],
        [None, b1, b2, None],
        [None, None, b2, b3],
    ]
}

/// Refine the given active cells into four children each
///
/// Cells that already have children are skipped.
pub fn refine_cells(tria: &mut Triangulation, cells: &[CellId]) -> RefinementResult {
    let mut new_cells = Vec::new();
    let mut refined_cells = Vec::new();
    let mut midpoint_mgr = MidpointManager::new();

    for &id in cells {
        let parent = tria.cell(id).clone();
        if !parent.is_active() {
            continue;
        }

        let v = parent.vertices;
        let m01 = midpoint_mgr.get_midpoint(tria, v[0], v[1]);
        let m12 = midpoint_mgr.get_midpoint(tria, v[1], v[2]);
        let m23 = midpoint_mgr.get_midpoint(tria, v[2], v[3]);
        let m30 = midpoint_mgr.get_midpoint(tria, v[3], v[0]);
        let center = midpoint_mgr.add_center(tria, &v);

        let child_vertices = [
            [v[0], m01, center, m30],
            [m01, v[1], m12, center],
            [center, m12, v[2], m23],
            [m30, center, m23, v[3]],
        ];
        let boundaries = child_boundaries(&parent.boundary);

        let child_level = id.level + 1;
        if tria.levels.len() <= child_level {
            tria.levels.push(Vec::new());
        }

        let mut children = [CellId::new(child_level, 0); 4];
        for (k, (vertices, boundary)) in child_vertices.into_iter().zip(boundaries).enumerate() {
            let child_id = CellId::new(child_level, tria.levels[child_level].len());
            tria.levels[child_level].push(Cell {
                vertices,
                level: child_level,
                parent: Some(id),
                children: None,
                boundary,
            });
            children[k] = child_id;
            new_cells.push(child_id);
        }

        tria.levels[id.level][id.index].children = Some(children);
        refined_cells.push(id);
    }

    RefinementResult {
        new_cells,
        refined_cells,
        new_vertices: midpoint_mgr.new_vertices,
    }
}

/// Uniform refinement of every active cell
pub fn uniform_refine(tria: &mut Triangulation) -> Result<RefinementResult, MeshError> {
    if tria.is_empty() {
        return Err(MeshError::Empty);
    }
    let active: Vec<CellId> = tria.active_cells().map(|(id, _)| id).collect();
    Ok(refine_cells(tria, &active))
}

impl Triangulation {
    /// Refine every active cell `times` times
    pub fn refine_global(&mut self, times: usize) -> Result<RefinementResult, MeshError> {
        if self.is_empty() {
            return Err(MeshError::Empty);
        }

        let mut result = RefinementResult::default();
        for _ in 0..times {
            result.merge(uniform_refine(self)?);
        }

        log::debug!(
            "Refined globally {} time(s): {} levels, {} active cells, {} vertices",
            times,
            self.n_levels(),
            self.n_active_cells(),
            self.n_vertices()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_refinement() {
        let mut tria = Triangulation::hyper_cube(0.0, 1.0).unwrap();
        let result = uniform_refine(&mut tria).unwrap();

        assert_eq!(result.new_cells.len(), 4);
        assert_eq!(result.refined_cells, vec![CellId::new(0, 0)]);
        // Four edge midpoints and one centre
        assert_eq!(result.new_vertices.len(), 5);
        assert_eq!(tria.n_vertices(), 9);
        assert_eq!(tria.n_levels(), 2);
    }

    #[test]
    fn test_midpoints_shared_between_neighbours() {
        let mut tria = Triangulation::hyper_cube(0.0, 1.0).unwrap();
        tria.refine_global(2).unwrap();

        // (2^2 + 1)^2 vertices, no duplicates along shared edges
        assert_eq!(tria.n_vertices(), 25);
    }

    #[test]
    fn test_cell_counts_after_global_refinement() {
        let mut tria = Triangulation::hyper_cube(0.0, 1.0).unwrap();
        tria.refine_global(3).unwrap();

        assert_eq!(tria.n_levels(), 4);
        assert_eq!(tria.n_active_cells(), 64);
        assert_eq!(tria.n_cells(), 1 + 4 + 16 + 64);
        for level in 0..4 {
            assert_eq!(tria.cells_on_level(level).len(), 4usize.pow(level as u32));
        }
    }

    #[test]
    fn test_children_preserve_area_and_parent_links() {
        let mut tria = Triangulation::hyper_cube(-1.0, 1.0).unwrap();
        tria.refine_global(1).unwrap();

        let root = CellId::new(0, 0);
        let children = tria.cell(root).children.unwrap();
        let area: f64 = children.iter().map(|&c| tria.cell_measure(c)).sum();
        assert!((area - tria.cell_measure(root)).abs() < 1e-14);
        for c in children {
            assert_eq!(tria.cell(c).parent, Some(root));
            assert_eq!(tria.cell(c).level, 1);
        }
    }

    #[test]
    fn test_children_inherit_boundary_faces() {
        let mut tria = Triangulation::hyper_cube(0.0, 1.0).unwrap();
        tria.refine_global(1).unwrap();

        for cell in tria.cells_on_level(1) {
            let on_boundary = cell.boundary.iter().filter(|b| b.is_some()).count();
            assert_eq!(on_boundary, 2);
        }

        tria.refine_global(1).unwrap();
        let interior = tria
            .cells_on_level(2)
            .iter()
            .filter(|c| !c.at_boundary())
            .count();
        assert_eq!(interior, 4);
    }

    #[test]
    fn test_refining_empty_triangulation_fails() {
        let mut tria = Triangulation::new();
        assert_eq!(tria.refine_global(1), Err(MeshError::Empty));
    }
}
