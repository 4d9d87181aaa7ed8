//! Mesh types, coarse mesh generators and global refinement
//!
//! Quadrilateral meshes only. The triangulation keeps every level, so both the
//! active cells and the full hierarchy are available after refinement.

mod generators;
mod refinement;
mod types;

pub use refinement::*;
pub use types::*;
