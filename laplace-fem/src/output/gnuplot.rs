//! Gnuplot patch output
//!
//! One patch per active cell. A patch lists `x y u` for the bottom two
//! vertices, a blank line, the top two vertices, and another blank line, so
//! that `splot` draws every cell as a surface element.

use super::OutputError;
use crate::dofs::ActiveDofs;
use crate::mesh::Triangulation;
use ndarray::Array1;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name used for the solution of a refinement cycle
pub fn solution_file_name(cycle: usize) -> String {
    format!("solution-{cycle}.gnuplot")
}

/// Write the nodal solution of every active cell in gnuplot patch format
pub fn write_gnuplot<W: Write, D: ActiveDofs + ?Sized>(
    writer: &mut W,
    mesh: &Triangulation,
    dofs: &D,
    solution: &Array1<f64>,
) -> Result<(), OutputError> {
    if solution.len() != dofs.n_dofs() {
        return Err(OutputError::DimensionMismatch {
            expected: dofs.n_dofs(),
            actual: solution.len(),
        });
    }

    writeln!(writer, "# Q1 nodal solution, one patch per active cell")?;
    writeln!(writer, "#")?;
    writeln!(writer, "# <x> <y> <solution>")?;

    let mut indices = Vec::with_capacity(4);
    for (id, cell) in mesh.active_cells() {
        dofs.cell_dof_indices(cell, &mut indices)?;
        let points = mesh.cell_vertices(id);

        // Tensor order: (v0, v1) then (v3, v2)
        for row in [[0, 1], [3, 2]] {
            for k in row {
                let p = points[k];
                writeln!(writer, "{} {} {}", p.x, p.y, solution[indices[k]])?;
            }
            writeln!(writer)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Write `solution-<cycle>.gnuplot` into `dir` and return its path
pub fn write_solution_file<D: ActiveDofs + ?Sized>(
    dir: &Path,
    cycle: usize,
    mesh: &Triangulation,
    dofs: &D,
    solution: &Array1<f64>,
) -> Result<PathBuf, OutputError> {
    let path = dir.join(solution_file_name(cycle));
    let mut writer = BufWriter::new(File::create(&path)?);
    write_gnuplot(&mut writer, mesh, dofs, solution)?;
    writer.flush()?;

    log::debug!("Wrote {}", path.display());
    Ok(path)
}
