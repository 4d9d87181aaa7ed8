//! Preconditioners for iterative solvers
//!
//! Preconditioners approximate A^(-1) to accelerate convergence of iterative methods.
//!
//! # Available Preconditioners
//!
//! - **SsorPreconditioner**: symmetric SOR sweep pair, suitable for CG
//! - **IdentityPreconditioner**: no preconditioning

mod ssor;

pub use ssor::SsorPreconditioner;

// Re-export IdentityPreconditioner from traits
pub use crate::traits::IdentityPreconditioner;
