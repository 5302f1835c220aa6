use std::path::PathBuf;
use std::time::Instant;

use balloon_equilibrium::config::{RunConfig, load_run_config};
use balloon_equilibrium::export::{profile, report, summary};
use balloon_equilibrium::plot::{self, ProfileSeries};
use balloon_equilibrium::solver::{EquilibriumRun, EquilibriumSolution};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Solve the equilibrium envelope shape and ascent velocity of a balloon at one altitude.
#[derive(Parser, Debug)]
#[command(author, version, about = "Balloon envelope equilibrium solver")]
struct Cli {
    /// Worker threads used by the shape grid search
    #[arg(long)]
    workers: usize,

    /// Altitude above sea level in metres
    #[arg(long)]
    altitude: f64,

    /// Run configuration (TOML or YAML); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving report.txt, profile.csv, summary.json and profile.png
    #[arg(long, default_value = "artifacts")]
    output_dir: PathBuf,

    /// Skip rendering the profile PNG
    #[arg(long, default_value_t = false)]
    no_plot: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if !cli.altitude.is_finite() {
        anyhow::bail!("altitude must be finite");
    }
    let config = match &cli.config {
        Some(path) => load_run_config(path)?,
        None => {
            let config = RunConfig::default();
            config.validate()?;
            config
        }
    };

    let start = Instant::now();
    let run = EquilibriumRun::new(&config, cli.altitude, cli.workers)?;
    info!(
        altitude_m = cli.altitude,
        workers = cli.workers,
        density_kg_m3 = run.atmosphere.density_kg_m3,
        "starting equilibrium solve"
    );
    let outcome = run.solve(&config)?;
    let converged = outcome.is_converged();
    let solution = outcome.into_value();
    let elapsed_s = start.elapsed().as_secs_f64();

    write_artifacts(&cli, &solution, converged, elapsed_s)?;
    println!(
        "Running time: {elapsed_s:.3} s, artifacts in {}",
        cli.output_dir.display()
    );

    if !converged {
        anyhow::bail!(
            "equilibrium loop stopped after {} iterations with gas mass residual {:.6e} kg",
            solution.iterations,
            solution.gas_mass_residual()
        );
    }
    Ok(())
}

fn write_artifacts(
    cli: &Cli,
    solution: &EquilibriumSolution,
    converged: bool,
    elapsed_s: f64,
) -> anyhow::Result<()> {
    let best = &solution.radius.search.best;
    let trajectory = &best.trajectory;
    let generated_at = chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();

    let run_summary = report::Summary {
        generated_at: &generated_at,
        converged,
        altitude_m: solution.altitude_m,
        workers: cli.workers,
        theta0_deg: best.point.theta0_deg(),
        shape_constant: best.point.shape_constant,
        max_radius_m: solution.max_radius_m(),
        last_theta_deg: trajectory.last_theta().unwrap_or(f64::NAN).to_degrees(),
        last_radius_m: trajectory.last_radius().unwrap_or(f64::NAN),
        loss: best.loss,
        volume_m3: solution.envelope.volume_m3,
        gas_mass_kg: solution.envelope.gas_mass_kg,
        gas_mass_residual_kg: solution.envelope.gas_mass_kg - solution.trial_gas_mass_kg,
        net_lift_n: solution.forces.net_lift_n,
        force_residual_n: solution.forces.residual_n,
        input_velocity_m_s: solution.trial_velocity_m_s,
        output_velocity_m_s: solution.forces.velocity_m_s,
        velocity_residual_m_s: solution.trial_velocity_m_s - solution.forces.velocity_m_s,
        radius_iterations: solution.radius.iterations,
        equilibrium_iterations: solution.iterations,
        elapsed_s,
    };

    let dir = &cli.output_dir;
    let mut writer = profile::writer_for_path(&dir.join("report.txt"))?;
    report::write_report(writer.as_mut(), &run_summary)?;

    let mut writer = profile::writer_for_path(&dir.join("profile.csv"))?;
    profile::write_profile(writer.as_mut(), &trajectory.z, &trajectory.r)?;

    summary::write_json(&dir.join("summary.json"), &run_summary, trajectory.len())?;

    if !cli.no_plot {
        let caption = format!(
            "altitude {:.0} m, v = {:.3} m/s",
            solution.altitude_m, solution.forces.velocity_m_s
        );
        plot::render_profile(
            &ProfileSeries::new(&trajectory.z, &trajectory.r),
            &dir.join("profile.png"),
            (800, 1000),
            &caption,
        )?;
    }
    Ok(())
}
