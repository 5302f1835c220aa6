//! Export helpers for profile CSV, text report and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a buffered writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod profile {
    use std::io::{self, Write};

    pub use crate::writer_for_path;

    const HEADER: &str = "index,z_m,r_m";

    /// Write the meridian profile CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// One meridian sample.
    #[derive(Debug, Clone, Copy)]
    pub struct Record {
        pub index: usize,
        pub z_m: f64,
        pub r_m: f64,
    }

    impl Record {
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(writer, "{},{:.6},{:.6}", self.index, self.z_m, self.r_m)
        }
    }

    /// Write header and every `(z, r)` pair. Extra samples of the longer slice are ignored.
    pub fn write_profile(writer: &mut dyn Write, z: &[f64], r: &[f64]) -> io::Result<()> {
        write_header(writer)?;
        for (index, (&z_m, &r_m)) in z.iter().zip(r).enumerate() {
            Record { index, z_m, r_m }.write_to(writer)?;
        }
        writer.flush()
    }
}

pub mod report {
    use serde::Serialize;
    use std::io::{self, Write};

    const RULE: &str = "___________________________________________________________________";

    /// Scalars describing one equilibrium run, shared by the text report and the JSON sidecar.
    #[derive(Debug, Clone, Serialize)]
    pub struct Summary<'a> {
        pub generated_at: &'a str,
        pub converged: bool,
        pub altitude_m: f64,
        pub workers: usize,
        pub theta0_deg: f64,
        pub shape_constant: f64,
        pub max_radius_m: f64,
        pub last_theta_deg: f64,
        pub last_radius_m: f64,
        pub loss: f64,
        pub volume_m3: f64,
        pub gas_mass_kg: f64,
        pub gas_mass_residual_kg: f64,
        pub net_lift_n: f64,
        pub force_residual_n: f64,
        pub input_velocity_m_s: f64,
        pub output_velocity_m_s: f64,
        pub velocity_residual_m_s: f64,
        pub radius_iterations: usize,
        pub equilibrium_iterations: usize,
        pub elapsed_s: f64,
    }

    /// Render the human-readable report.
    pub fn write_report(writer: &mut dyn Write, summary: &Summary<'_>) -> io::Result<()> {
        writeln!(
            writer,
            "_______________________ altitude = {} m _______________________",
            summary.altitude_m
        )?;
        writeln!(writer, "Generated: {}", summary.generated_at)?;
        writeln!(
            writer,
            "Status: {}",
            if summary.converged {
                "converged"
            } else {
                "iteration cap reached"
            }
        )?;
        writeln!(
            writer,
            "theta0: {:.6} deg, a: {:.6}",
            summary.theta0_deg, summary.shape_constant
        )?;
        writeln!(writer, "Maximum radius: {:.6} m", summary.max_radius_m)?;
        writeln!(
            writer,
            "Last theta: {:.6} deg, last r: {:.6} m",
            summary.last_theta_deg, summary.last_radius_m
        )?;
        writeln!(writer, "Boundary loss: {:.6e}", summary.loss)?;
        writeln!(writer, "{RULE}")?;
        writeln!(writer, "Volume: {:.6} m^3", summary.volume_m3)?;
        writeln!(writer, "Gas mass: {:.6} kg", summary.gas_mass_kg)?;
        writeln!(
            writer,
            "Gas mass residual: {:.6e} kg",
            summary.gas_mass_residual_kg
        )?;
        writeln!(writer, "Fa - Fg: {:.6} N", summary.net_lift_n)?;
        writeln!(
            writer,
            "(Fa - Fg) + F_drag: {:.6e} N",
            summary.force_residual_n
        )?;
        writeln!(
            writer,
            "Input velocity: {:.6} m/s",
            summary.input_velocity_m_s
        )?;
        writeln!(
            writer,
            "Output velocity: {:.6} m/s",
            summary.output_velocity_m_s
        )?;
        writeln!(
            writer,
            "Velocity residual: {:.6e} m/s",
            summary.velocity_residual_m_s
        )?;
        writeln!(writer, "{RULE}")?;
        writeln!(
            writer,
            "Radius iterations: {}, equilibrium iterations: {}, workers: {}",
            summary.radius_iterations, summary.equilibrium_iterations, summary.workers
        )?;
        writeln!(writer, "Running time: {:.3} s", summary.elapsed_s)?;
        writer.flush()
    }
}

pub mod summary {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    use crate::report::Summary;

    #[derive(Serialize)]
    struct SummarySidecar<'a> {
        #[serde(flatten)]
        summary: &'a Summary<'a>,
        profile_samples: usize,
    }

    /// Write the run summary as pretty-printed JSON next to the other artifacts.
    pub fn write_json(
        path: &Path,
        summary: &Summary<'_>,
        profile_samples: usize,
    ) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let sidecar = SummarySidecar {
            summary,
            profile_samples,
        };
        to_writer_pretty(File::create(path)?, &sidecar)?;
        Ok(())
    }
}
