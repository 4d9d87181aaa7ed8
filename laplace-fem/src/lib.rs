//! Multilevel finite elements for the Laplace equation
//!
//! Solves -Δu = f with homogeneous Dirichlet data on a square, on a sequence
//! of globally refined quadrilateral meshes. Every refinement cycle assembles
//! the global system over the active cells and one stiffness matrix per mesh
//! level, then solves the global system with SSOR-preconditioned CG.
//!
//! # Features
//!
//! - **Hierarchical meshes**: quadrilaterals with all refinement levels kept
//! - **Q1 elements**: bilinear Lagrange basis, Gauss quadrature
//! - **DoF numbering**: global (active cells) and per level
//! - **Assembly**: pattern-checked scatter into CSR matrices
//! - **Dirichlet elimination**: symmetric, idempotent
//! - **Output**: gnuplot patches per cycle
//!
//! # Example
//!
//! ```no_run
//! use fem::{LaplaceConfig, LaplaceProblem};
//!
//! let mut problem = LaplaceProblem::new(LaplaceConfig::default())?;
//! for report in problem.run()? {
//!     println!("{report}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assembly;
pub mod basis;
pub mod boundary;
pub mod config;
pub mod dofs;
pub mod mesh;
pub mod output;
pub mod problem;
pub mod quadrature;
pub mod solver;

pub use config::{ConfigError, LaplaceConfig};
pub use problem::{CycleError, CycleReport, CycleStage, LaplaceProblem, StageError};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
