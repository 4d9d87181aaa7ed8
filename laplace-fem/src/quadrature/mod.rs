//! Numerical quadrature rules for finite element integration
//!
//! Gauss-Legendre rules on the reference quadrilateral [-1,1]².

mod gauss;
mod rules;

pub use gauss::*;
pub use rules::*;
