use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

/// Coarse single-depth search with tolerances wide enough that every profile is feasible.
fn write_config(dir: &Path, mgas_tol: f64, initial_gas_mass_kg: f64) -> String {
    let path = dir.join("run.toml");
    let contents = format!(
        "[physics]\n\
         max_solver_steps = 5000\n\
         \n\
         [search.low]\n\
         theta_min_deg = 0.0\n\
         theta_max_deg = 25.0\n\
         a_min = 5.0\n\
         a_max = 16.0\n\
         theta_steps = 5\n\
         a_steps = 4\n\
         \n\
         [search.refinement]\n\
         depths = 1\n\
         theta_tol_deg = 1000.0\n\
         radius_tol = 1000000.0\n\
         \n\
         [convergence]\n\
         rmax_tol = 1000.0\n\
         mgas_tol = {mgas_tol:e}\n\
         initial_gas_mass_kg = {initial_gas_mass_kg:?}\n\
         max_radius_iterations = 2\n\
         max_equilibrium_iterations = 1\n"
    );
    fs::write(&path, contents).expect("write config");
    path.to_str().expect("utf8 path").to_string()
}

fn run_equilibrium(config: &str, output_dir: &Path) -> assert_cmd::assert::Assert {
    Command::cargo_bin("equilibrium")
        .expect("equilibrium bin")
        .args([
            "--workers",
            "2",
            "--altitude",
            "10000",
            "--config",
            config,
            "--output-dir",
            output_dir.to_str().unwrap(),
        ])
        .assert()
}

fn assert_artifacts(output_dir: &Path) -> String {
    for name in ["report.txt", "profile.csv", "summary.json", "profile.png"] {
        let metadata = fs::metadata(output_dir.join(name)).expect(name);
        assert!(metadata.len() > 0, "{name} should not be empty");
    }
    let csv = fs::read_to_string(output_dir.join("profile.csv")).expect("profile csv");
    assert!(csv.starts_with("index,z_m,r_m\n"));
    fs::read_to_string(output_dir.join("report.txt")).expect("report")
}

#[test]
fn converged_run_writes_all_artifacts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(dir.path(), 1.0e6, 0.0);
    let output_dir = dir.path().join("artifacts");

    run_equilibrium(&config, &output_dir)
        .success()
        .stdout(predicate::str::contains("Running time"));

    let report = assert_artifacts(&output_dir);
    assert!(report.contains("Status: converged"));
    assert!(report.contains("Maximum radius"));
}

#[test]
fn capped_run_writes_artifacts_then_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(dir.path(), 1.0e-12, -1.0);
    let output_dir = dir.path().join("artifacts");

    run_equilibrium(&config, &output_dir)
        .failure()
        .stderr(predicate::str::contains("equilibrium loop stopped"));

    let report = assert_artifacts(&output_dir);
    assert!(report.contains("Status: iteration cap reached"));
}
