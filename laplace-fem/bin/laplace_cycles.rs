//! Laplace problem on a sequence of globally refined meshes
//!
//! Runs the refinement cycles, prints a summary per cycle and writes
//! `solution-<cycle>.gnuplot` for each of them.
//!
//! Usage:
//!   cargo run --release --bin laplace-cycles
//!   cargo run --release --bin laplace-cycles -- --cycles 4 --output-dir out

use anyhow::Context;
use clap::Parser;
use fem::{CycleReport, LaplaceConfig, LaplaceProblem};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "laplace-cycles")]
#[command(about = "Q1 Laplace solver over globally refined meshes with per-level matrices")]
struct Args {
    /// Path to JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of refinement cycles (overrides the config file)
    #[arg(long)]
    cycles: Option<usize>,

    /// Directory for the gnuplot files (overrides the config file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip writing gnuplot files
    #[arg(long)]
    no_output: bool,

    /// Save the per-cycle reports as JSON
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    log::info!("laplace-cycles {}", fem::version());

    let mut config = match &args.config {
        Some(path) => LaplaceConfig::load_json(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => LaplaceConfig::default(),
    };
    if let Some(cycles) = args.cycles {
        config.n_cycles = cycles;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if args.no_output {
        config.write_output = false;
    }

    if config.write_output {
        std::fs::create_dir_all(&config.output_dir).with_context(|| {
            format!("creating output directory {}", config.output_dir.display())
        })?;
    }

    let start = Instant::now();
    let mut problem = LaplaceProblem::new(config)?;

    let reports = problem.run_with(|report| println!("{report}"))?;

    log::info!(
        "{} cycles finished in {:.1}ms",
        reports.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    if let Some(path) = &args.report {
        save_reports(&reports, path)?;
    }

    Ok(())
}

fn save_reports(reports: &[CycleReport], path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(reports)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
