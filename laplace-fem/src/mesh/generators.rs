//! Coarse mesh generators

use super::types::{Cell, MeshError, Point, Triangulation};

impl Triangulation {
    /// Single square cell `[left, right]²`, every face carrying boundary id 0
    pub fn hyper_cube(left: f64, right: f64) -> Result<Self, MeshError> {
        if !(left < right) {
            return Err(MeshError::InvalidDomain { left, right });
        }

        let mut tria = Triangulation::new();
        let v = [
            tria.add_vertex(Point::new(left, left)),
            tria.add_vertex(Point::new(right, left)),
            tria.add_vertex(Point::new(right, right)),
            tria.add_vertex(Point::new(left, right)),
        ];
        tria.add_coarse_cell(Cell::new(v, [Some(0); 4]));

        Ok(tria)
    }
}
