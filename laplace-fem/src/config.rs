//! Run configuration
//!
//! Defaults reproduce the standard six-cycle run on the unit square. A JSON
//! file may override any subset of the fields.

use crate::basis::FeQ1;
use crate::mesh::BoundaryId;
use crate::quadrature::required_points_for_stiffness;
use crate::solver::SolverConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parameters of a refinement-cycle run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaplaceConfig {
    /// Number of refinement cycles (cycle 0 is the single coarse cell)
    pub n_cycles: usize,
    /// Square domain `[left, right]²`
    pub domain: (f64, f64),
    /// Constant right-hand side f
    pub source: f64,
    /// Boundary indicator carrying the homogeneous Dirichlet condition
    pub boundary_id: BoundaryId,
    /// Gauss points per direction
    pub quadrature_points: usize,
    /// Linear solver settings
    pub solver: SolverConfig,
    /// Directory receiving `solution-<cycle>.gnuplot`
    pub output_dir: PathBuf,
    /// Whether to write solution files at all
    pub write_output: bool,
}

impl Default for LaplaceConfig {
    fn default() -> Self {
        Self {
            n_cycles: 6,
            domain: (0.0, 1.0),
            source: 1.0,
            boundary_id: 0,
            quadrature_points: 2,
            solver: SolverConfig::default(),
            output_dir: PathBuf::from("."),
            write_output: true,
        }
    }
}

impl LaplaceConfig {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load_json(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Reject values the run cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid {
                field,
                reason: reason.into(),
            })
        }

        if self.n_cycles == 0 {
            return invalid("n_cycles", "at least one cycle is required");
        }
        let (left, right) = self.domain;
        if !(left.is_finite() && right.is_finite() && left < right) {
            return invalid("domain", format!("[{left}, {right}] is empty"));
        }
        if !self.source.is_finite() {
            return invalid("source", "must be finite");
        }
        let needed = required_points_for_stiffness(FeQ1::new().degree());
        if self.quadrature_points < needed {
            return invalid(
                "quadrature_points",
                format!("{needed} points per direction are needed for an exact stiffness matrix"),
            );
        }
        if self.solver.max_iterations == 0 {
            return invalid("solver.max_iterations", "must be positive");
        }
        if !(self.solver.tolerance > 0.0) {
            return invalid("solver.tolerance", "must be positive");
        }
        if !(self.solver.relaxation > 0.0 && self.solver.relaxation < 2.0) {
            return invalid("solver.relaxation", "SSOR needs 0 < omega < 2");
        }
        Ok(())
    }
}
