use std::path::PathBuf;

use balloon_equilibrium::plot::{read_profile_csv, render_profile};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render an envelope meridian profile from CSV (z_m, r_m)"
)]
struct Cli {
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "artifacts/profile.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = 1000)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let profile = read_profile_csv(&cli.input)?;
    if profile.is_empty() {
        return Err(anyhow::anyhow!(
            "No finite profile samples in {}",
            cli.input.display()
        ));
    }
    let caption = format!("Envelope profile ({} samples)", profile.len());
    render_profile(&profile, &cli.output, (cli.width, cli.height), &caption)?;
    Ok(())
}
