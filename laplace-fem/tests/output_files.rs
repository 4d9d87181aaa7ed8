//! Gnuplot files and configuration files on disk

use fem::output::solution_file_name;
use fem::{LaplaceConfig, LaplaceProblem};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_one_gnuplot_file_per_cycle() {
    let dir = tempdir().unwrap();
    let config = LaplaceConfig {
        n_cycles: 3,
        output_dir: dir.path().to_path_buf(),
        ..LaplaceConfig::default()
    };

    let mut problem = LaplaceProblem::new(config).unwrap();
    let reports = problem.run().unwrap();

    for report in &reports {
        let expected = dir.path().join(solution_file_name(report.cycle));
        assert_eq!(report.output_file.as_deref(), Some(expected.as_path()));

        let text = fs::read_to_string(&expected).unwrap();
        let data: Vec<&str> = text
            .lines()
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();
        assert_eq!(data.len(), 4 * report.n_active_cells);

        for line in data {
            let fields: Vec<f64> = line
                .split_whitespace()
                .map(|f| f.parse().unwrap())
                .collect();
            assert_eq!(fields.len(), 3);
            assert!((0.0..=1.0).contains(&fields[0]));
            assert!((0.0..=1.0).contains(&fields[1]));
            assert!(fields[2] >= 0.0);
        }
    }
}

#[test]
fn test_no_files_when_output_disabled() {
    let dir = tempdir().unwrap();
    let config = LaplaceConfig {
        n_cycles: 2,
        output_dir: dir.path().to_path_buf(),
        write_output: false,
        ..LaplaceConfig::default()
    };

    let reports = LaplaceProblem::new(config).unwrap().run().unwrap();

    assert!(reports.iter().all(|r| r.output_file.is_none()));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_output_dir_aborts_cycle() {
    let dir = tempdir().unwrap();
    let config = LaplaceConfig {
        n_cycles: 2,
        output_dir: dir.path().join("does-not-exist"),
        ..LaplaceConfig::default()
    };

    let err = LaplaceProblem::new(config).unwrap().run().unwrap_err();
    assert_eq!(err.cycle, 0);
    assert_eq!(err.stage, fem::CycleStage::Output);
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("laplace.json");
    let config = LaplaceConfig {
        n_cycles: 4,
        source: 2.0,
        ..LaplaceConfig::default()
    };
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    assert_eq!(LaplaceConfig::load_json(&path).unwrap(), config);
}
