//! Iterative solvers for linear systems
//!
//! - [`pcg`]: preconditioned Conjugate Gradient for symmetric positive definite systems

mod cg;

pub use cg::{CgConfig, CgSolution, CgStatus, pcg};
