use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;

#[test]
fn profile_plot_renders_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("profile.csv");
    let png_path = dir.path().join("profile.png");

    let mut file = File::create(&csv_path).expect("csv create");
    writeln!(file, "index,z_m,r_m").unwrap();
    for i in 0..40 {
        let s = i as f64 / 39.0;
        let z = 3.0 * s;
        let r = 1.5 * (std::f64::consts::PI * s).sin();
        writeln!(file, "{i},{z:.6},{r:.6}").unwrap();
    }
    drop(file);

    Command::cargo_bin("profile_plot")
        .expect("profile_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            png_path.to_str().unwrap(),
            "--width",
            "300",
            "--height",
            "400",
        ])
        .assert()
        .success();

    let metadata = fs::metadata(png_path).expect("png metadata");
    assert!(metadata.len() > 0, "PNG output should not be empty");
}

#[test]
fn profile_plot_rejects_csv_without_radius() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("bad.csv");
    fs::write(&csv_path, "index,z_m\n0,0.0\n").expect("write csv");

    Command::cargo_bin("profile_plot")
        .expect("profile_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            dir.path().join("bad.png").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("r_m"));
}

#[test]
fn equilibrium_rejects_zero_workers() {
    let dir = tempfile::tempdir().expect("tempdir");
    Command::cargo_bin("equilibrium")
        .expect("equilibrium bin")
        .args([
            "--workers",
            "0",
            "--altitude",
            "10000",
            "--output-dir",
            dir.path().to_str().unwrap(),
            "--no-plot",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("worker pool size"));
}
