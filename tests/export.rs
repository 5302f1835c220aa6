use std::fs;

use balloon_equilibrium::export::{profile, report, summary};

fn sample_summary(generated_at: &str) -> report::Summary<'_> {
    report::Summary {
        generated_at,
        converged: true,
        altitude_m: 10_000.0,
        workers: 4,
        theta0_deg: 12.5,
        shape_constant: 9.75,
        max_radius_m: 2.4,
        last_theta_deg: -89.2,
        last_radius_m: 0.01,
        loss: 0.012,
        volume_m3: 41.0,
        gas_mass_kg: 2.3,
        gas_mass_residual_kg: 0.004,
        net_lift_n: 12.0,
        force_residual_n: 1.0e-12,
        input_velocity_m_s: 4.1,
        output_velocity_m_s: 4.12,
        velocity_residual_m_s: -0.02,
        radius_iterations: 3,
        equilibrium_iterations: 5,
        elapsed_s: 1.5,
    }
}

#[test]
fn profile_csv_has_header_and_rows() {
    let mut buffer: Vec<u8> = Vec::new();
    profile::write_profile(&mut buffer, &[0.0, 0.02, 0.04], &[0.05, 0.06, 0.07])
        .expect("write profile");
    let text = String::from_utf8(buffer).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "index,z_m,r_m");
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "0,0.000000,0.050000");
    assert!(lines[3].starts_with("2,0.040000,"));
}

#[test]
fn report_lists_key_quantities() {
    let mut buffer: Vec<u8> = Vec::new();
    report::write_report(&mut buffer, &sample_summary("2026-01-01 00:00:00 UTC"))
        .expect("write report");
    let text = String::from_utf8(buffer).expect("utf8");
    assert!(text.contains("altitude = 10000 m"));
    assert!(text.contains("Status: converged"));
    assert!(text.contains("theta0: 12.500000 deg, a: 9.750000"));
    assert!(text.contains("Volume: 41.000000 m^3"));
    assert!(text.contains("Radius iterations: 3, equilibrium iterations: 5"));
    assert!(text.contains("Running time: 1.500 s"));
}

#[test]
fn json_summary_round_trips_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("summary.json");
    summary::write_json(&path, &sample_summary("now"), 321).expect("write json");

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read json")).expect("parse json");
    assert_eq!(value["profile_samples"], 321);
    assert_eq!(value["equilibrium_iterations"], 5);
    assert_eq!(value["converged"], true);
    assert_eq!(value["generated_at"], "now");
}

#[test]
fn writer_creates_parent_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("a").join("b").join("profile.csv");
    {
        let mut writer = profile::writer_for_path(&path).expect("writer");
        profile::write_header(writer.as_mut()).expect("header");
    }
    assert_eq!(fs::read_to_string(&path).expect("read"), "index,z_m,r_m\n");
}
