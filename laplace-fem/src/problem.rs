//! Refinement-cycle driver for the Laplace problem
//!
//! [`LaplaceProblem`] owns the mesh and every per-cycle object. Each cycle
//! walks the stages of [`CycleStage`]: generate or refine the mesh, set up
//! DoFs and matrices, assemble the global system and the level matrices,
//! eliminate boundary values and solve, and finally write the solution.

use crate::assembly::{self, AssemblyError, LevelObject};
use crate::basis::{CellValues, FeQ1};
use crate::boundary::{self, BoundaryError, BoundaryValues};
use crate::config::{ConfigError, LaplaceConfig};
use crate::dofs::{
    ActiveDofs, DofError, DofHandler, LevelDofs, make_level_sparsity_pattern,
    make_sparsity_pattern,
};
use crate::mesh::{MeshError, Triangulation};
use crate::output::{self, OutputError};
use crate::quadrature::QuadratureRule;
use crate::solver::{self, SolveSummary, SolverError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use solvers::CsrMatrix;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Stage of the refinement cycle state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    Initial,
    GenerateBase,
    Refine,
    Setup,
    Assemble,
    Solve,
    Output,
    Done,
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleStage::Initial => "initial",
            CycleStage::GenerateBase => "base mesh generation",
            CycleStage::Refine => "refinement",
            CycleStage::Setup => "setup",
            CycleStage::Assemble => "assembly",
            CycleStage::Solve => "solve",
            CycleStage::Output => "output",
            CycleStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Failure of one stage
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Dof(#[from] DofError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error(transparent)]
    Boundary(#[from] BoundaryError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("{0} called before DoFs were distributed")]
    NotSetUp(&'static str),
}

/// A stage failure tagged with the cycle it happened in
#[derive(Debug, Error)]
#[error("cycle {cycle} failed during {stage}")]
pub struct CycleError {
    pub cycle: usize,
    pub stage: CycleStage,
    #[source]
    pub source: StageError,
}

/// Summary of one completed cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle: usize,
    pub n_active_cells: usize,
    pub n_cells: usize,
    pub n_dofs: usize,
    /// DoFs per level, coarsest first
    pub level_dofs: Vec<usize>,
    pub cg_iterations: usize,
    pub residual: f64,
    pub output_file: Option<PathBuf>,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let by_level = self
            .level_dofs
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");

        writeln!(f, "Cycle {}:", self.cycle)?;
        writeln!(f, "   Number of active cells:       {}", self.n_active_cells)?;
        writeln!(f, "   Total number of cells:        {}", self.n_cells)?;
        writeln!(
            f,
            "   Number of degrees of freedom: {} (by level: {})",
            self.n_dofs, by_level
        )?;
        write!(
            f,
            "   {} CG iterations needed to obtain convergence.",
            self.cg_iterations
        )
    }
}

/// Laplace problem on a globally refined square with per-level matrices
pub struct LaplaceProblem {
    config: LaplaceConfig,
    triangulation: Triangulation,
    fe: FeQ1,
    cell_values: CellValues,
    dof_handler: Option<DofHandler>,

    system_matrix: CsrMatrix<f64>,
    system_rhs: Array1<f64>,
    solution: Array1<f64>,
    boundary_values: BoundaryValues,

    level_matrices: LevelObject<CsrMatrix<f32>>,

    stage: CycleStage,
}

impl LaplaceProblem {
    /// Create a problem with a validated configuration and an empty mesh
    pub fn new(config: LaplaceConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let fe = FeQ1::new();
        let quadrature = QuadratureRule::gauss_quadrilateral(config.quadrature_points);

        Ok(Self {
            cell_values: CellValues::new(fe, quadrature),
            config,
            triangulation: Triangulation::new(),
            fe,
            dof_handler: None,
            system_matrix: CsrMatrix::new(0, 0),
            system_rhs: Array1::zeros(0),
            solution: Array1::zeros(0),
            boundary_values: BoundaryValues::new(),
            level_matrices: LevelObject::new(),
            stage: CycleStage::Initial,
        })
    }

    pub fn stage(&self) -> CycleStage {
        self.stage
    }

    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }

    pub fn dof_handler(&self) -> Option<&DofHandler> {
        self.dof_handler.as_ref()
    }

    pub fn system_matrix(&self) -> &CsrMatrix<f64> {
        &self.system_matrix
    }

    pub fn system_rhs(&self) -> &Array1<f64> {
        &self.system_rhs
    }

    pub fn solution(&self) -> &Array1<f64> {
        &self.solution
    }

    pub fn boundary_values(&self) -> &BoundaryValues {
        &self.boundary_values
    }

    pub fn level_matrices(&self) -> &LevelObject<CsrMatrix<f32>> {
        &self.level_matrices
    }

    /// Create the coarse cell on cycle 0, refine once on later cycles
    pub fn generate_or_refine(&mut self, cycle: usize) -> Result<(), MeshError> {
        if cycle == 0 {
            self.stage = CycleStage::GenerateBase;
            let (left, right) = self.config.domain;
            self.triangulation = Triangulation::hyper_cube(left, right)?;
        } else {
            self.stage = CycleStage::Refine;
            self.triangulation.refine_global(1)?;
        }
        Ok(())
    }

    /// Distribute DoFs, build sparsity patterns and reset every matrix and vector
    pub fn setup_system(&mut self) -> Result<(), DofError> {
        self.stage = CycleStage::Setup;

        let dofs = DofHandler::distribute(&self.triangulation, self.fe)?;
        let n_dofs = dofs.n_dofs();

        let pattern = make_sparsity_pattern(&self.triangulation, &dofs)?;
        debug_assert!(
            pattern.is_symmetric(),
            "boundary elimination needs a structurally symmetric pattern"
        );
        self.system_matrix = CsrMatrix::from_pattern(&pattern);
        self.system_rhs = Array1::zeros(n_dofs);
        self.solution = Array1::zeros(n_dofs);
        self.boundary_values.clear();

        let level_patterns = (0..dofs.n_levels())
            .map(|level| make_level_sparsity_pattern(&self.triangulation, &dofs, level))
            .collect::<Result<Vec<_>, _>>()?;
        self.level_matrices
            .resize_with(level_patterns.len(), |level| {
                CsrMatrix::from_pattern(&level_patterns[level])
            });

        log::debug!(
            "Setup: {} DoFs, {} nonzeros (at most {} per row), {} level matrices",
            n_dofs,
            pattern.nnz(),
            pattern.max_row_length(),
            self.level_matrices.n_levels()
        );

        self.dof_handler = Some(dofs);
        Ok(())
    }

    /// Assemble the global matrix and load vector over the active cells
    ///
    /// Previous values are discarded, so the stage can be repeated.
    pub fn assemble_system(&mut self) -> Result<(), StageError> {
        self.stage = CycleStage::Assemble;
        let dofs = self
            .dof_handler
            .as_ref()
            .ok_or(StageError::NotSetUp("assemble_system"))?;

        self.system_matrix.clear_values();
        self.system_rhs.fill(0.0);
        assembly::assemble_system(
            &self.triangulation,
            dofs,
            &mut self.cell_values,
            self.config.source,
            &mut self.system_matrix,
            &mut self.system_rhs,
        )?;
        Ok(())
    }

    /// Assemble one stiffness matrix per level over every cell of that level
    ///
    /// Previous values are discarded, so the stage can be repeated.
    pub fn assemble_multigrid(&mut self) -> Result<(), StageError> {
        self.stage = CycleStage::Assemble;
        let dofs = self
            .dof_handler
            .as_ref()
            .ok_or(StageError::NotSetUp("assemble_multigrid"))?;

        for matrix in self.level_matrices.iter_mut() {
            matrix.clear_values();
        }
        assembly::assemble_multigrid(
            &self.triangulation,
            dofs,
            &mut self.cell_values,
            &mut self.level_matrices,
        )?;
        Ok(())
    }

    /// Interpolate homogeneous Dirichlet data and eliminate it from the system
    pub fn apply_boundary_values(&mut self) -> Result<(), StageError> {
        self.stage = CycleStage::Solve;
        let dofs = self
            .dof_handler
            .as_ref()
            .ok_or(StageError::NotSetUp("apply_boundary_values"))?;

        self.boundary_values = boundary::interpolate_boundary_values(
            &self.triangulation,
            dofs,
            self.config.boundary_id,
            |_| 0.0,
        )?;
        boundary::apply_boundary_values(
            &self.boundary_values,
            &mut self.system_matrix,
            &mut self.solution,
            &mut self.system_rhs,
        )?;
        Ok(())
    }

    /// Solve the eliminated system with SSOR-preconditioned CG
    pub fn solve(&mut self) -> Result<SolveSummary, SolverError> {
        self.stage = CycleStage::Solve;
        solver::solve(
            &self.system_matrix,
            &self.system_rhs,
            &mut self.solution,
            &self.config.solver,
        )
    }

    /// Write `solution-<cycle>.gnuplot` if output is enabled
    pub fn output_results(&mut self, cycle: usize) -> Result<Option<PathBuf>, StageError> {
        self.stage = CycleStage::Output;
        if !self.config.write_output {
            return Ok(None);
        }
        let dofs = self
            .dof_handler
            .as_ref()
            .ok_or(StageError::NotSetUp("output_results"))?;

        let path = output::write_solution_file(
            &self.config.output_dir,
            cycle,
            &self.triangulation,
            dofs,
            &self.solution,
        )?;
        Ok(Some(path))
    }

    /// Run one full cycle
    pub fn run_cycle(&mut self, cycle: usize) -> Result<CycleReport, CycleError> {
        let tag = move |stage: CycleStage| move |source: StageError| CycleError {
            cycle,
            stage,
            source,
        };

        self.generate_or_refine(cycle)
            .map_err(|e| tag(self.stage)(e.into()))?;
        log::info!(
            "Cycle {}: {} active cells, {} cells in total",
            cycle,
            self.triangulation.n_active_cells(),
            self.triangulation.n_cells()
        );
        self.setup_system()
            .map_err(|e| tag(CycleStage::Setup)(e.into()))?;

        self.assemble_system().map_err(tag(CycleStage::Assemble))?;
        self.assemble_multigrid().map_err(tag(CycleStage::Assemble))?;
        log::debug!(
            "Assembled {} level matrices; the solver uses SSOR on the global matrix only",
            self.level_matrices.n_levels()
        );

        self.apply_boundary_values().map_err(tag(CycleStage::Solve))?;
        let summary = self
            .solve()
            .map_err(|e| tag(CycleStage::Solve)(e.into()))?;

        let output_file = self.output_results(cycle).map_err(tag(CycleStage::Output))?;

        let dofs = self.dof_handler.as_ref().ok_or_else(|| {
            tag(CycleStage::Output)(StageError::NotSetUp("run_cycle"))
        })?;

        let report = CycleReport {
            cycle,
            n_active_cells: self.triangulation.n_active_cells(),
            n_cells: self.triangulation.n_cells(),
            n_dofs: dofs.n_dofs(),
            level_dofs: dofs.level_dof_counts(),
            cg_iterations: summary.iterations,
            residual: summary.residual,
            output_file,
        };

        log::info!(
            "Cycle {}: {} DoFs, {} CG iterations",
            cycle,
            report.n_dofs,
            report.cg_iterations
        );

        Ok(report)
    }

    /// Run all configured cycles, stopping at the first failure
    pub fn run(&mut self) -> Result<Vec<CycleReport>, CycleError> {
        self.run_with(|_| {})
    }

    /// Run all configured cycles, handing each report to `on_cycle` as soon
    /// as its cycle finishes
    pub fn run_with<F>(&mut self, mut on_cycle: F) -> Result<Vec<CycleReport>, CycleError>
    where
        F: FnMut(&CycleReport),
    {
        let mut reports = Vec::with_capacity(self.config.n_cycles);
        for cycle in 0..self.config.n_cycles {
            let report = self.run_cycle(cycle)?;
            on_cycle(&report);
            reports.push(report);
        }
        self.stage = CycleStage::Done;
        Ok(reports)
    }
}
