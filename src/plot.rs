//! Meridian profile rendering with plotters.

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use plotters::prelude::*;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("failed to read profile CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("profile CSV missing '{0}' column")]
    MissingColumn(&'static str),
    #[error("profile has no finite samples")]
    EmptyProfile,
    #[error("output path contains invalid UTF-8")]
    InvalidPath,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("drawing failed: {0}")]
    Draw(String),
}

/// Axial position and radius samples of one envelope meridian.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSeries {
    pub z: Vec<f64>,
    pub r: Vec<f64>,
}

impl ProfileSeries {
    pub fn new(z: &[f64], r: &[f64]) -> Self {
        let (z, r) = z
            .iter()
            .zip(r)
            .filter(|(z, r)| z.is_finite() && r.is_finite())
            .map(|(&z, &r)| (z, r))
            .unzip();
        Self { z, r }
    }

    pub fn len(&self) -> usize {
        self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }

    fn ranges(&self) -> Option<((f64, f64), (f64, f64))> {
        if self.is_empty() {
            return None;
        }
        let r_max = self.r.iter().fold(0.0_f64, |acc, r| acc.max(r.abs()));
        let z_min = self.z.iter().copied().fold(f64::INFINITY, f64::min);
        let z_max = self.z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let r_pad = (r_max * 1.1).max(1e-3);
        let z_pad = ((z_max - z_min) * 0.05).max(1e-3);
        Some(((-r_pad, r_pad), (z_min - z_pad, z_max + z_pad)))
    }
}

/// Load `z_m` and `r_m` columns from a profile CSV.
pub fn read_profile_csv(path: &Path) -> Result<ProfileSeries, PlotError> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let z_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("z_m"))
        .ok_or(PlotError::MissingColumn("z_m"))?;
    let r_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("r_m"))
        .ok_or(PlotError::MissingColumn("r_m"))?;

    let mut z = Vec::new();
    let mut r = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let z_val: f64 = rec.get(z_idx).unwrap_or("").trim().parse().unwrap_or(f64::NAN);
        let r_val: f64 = rec.get(r_idx).unwrap_or("").trim().parse().unwrap_or(f64::NAN);
        z.push(z_val);
        r.push(r_val);
    }
    Ok(ProfileSeries::new(&z, &r))
}

/// Render the profile mirrored about the envelope axis to a PNG.
///
/// Falls back to an unlabelled chart when no system font can be loaded.
pub fn render_profile(
    profile: &ProfileSeries,
    output: &Path,
    size: (u32, u32),
    caption: &str,
) -> Result<(), PlotError> {
    if profile.is_empty() {
        return Err(PlotError::EmptyProfile);
    }
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = output.to_str().ok_or(PlotError::InvalidPath)?;

    match draw(profile, output_str, size, Some(caption)) {
        Ok(()) => Ok(()),
        Err(err) => {
            warn!(error = %err, "labelled plot failed, retrying without text");
            draw(profile, output_str, size, None)
        }
    }
}

fn draw(
    profile: &ProfileSeries,
    output: &str,
    size: (u32, u32),
    caption: Option<&str>,
) -> Result<(), PlotError> {
    let ((r_lo, r_hi), (z_lo, z_hi)) = profile.ranges().ok_or(PlotError::EmptyProfile)?;
    let root = BitMapBackend::new(output, size).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if let Some(caption) = caption {
        let font_family = select_font_family();
        builder
            .caption(caption, FontDesc::new(font_family, 22.0, FontStyle::Bold))
            .x_label_area_size(50)
            .y_label_area_size(60);
    }
    let mut chart = builder
        .build_cartesian_2d(r_lo..r_hi, z_lo..z_hi)
        .map_err(draw_error)?;

    if caption.is_some() {
        chart
            .configure_mesh()
            .x_desc("r (m)")
            .y_desc("z (m)")
            .x_labels(6)
            .y_labels(6)
            .draw()
            .map_err(draw_error)?;
    }

    let right: Vec<(f64, f64)> = profile.r.iter().zip(&profile.z).map(|(&r, &z)| (r, z)).collect();
    let left: Vec<(f64, f64)> = right.iter().map(|&(r, z)| (-r, z)).collect();
    let style = || ShapeStyle::from(&BLUE).stroke_width(2);
    chart
        .draw_series(LineSeries::new(right, style()))
        .map_err(draw_error)?;
    chart
        .draw_series(LineSeries::new(left, style()))
        .map_err(draw_error)?;
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, z_lo), (0.0, z_hi)],
            ShapeStyle::from(&BLACK.mix(0.4)).stroke_width(1),
        )))
        .map_err(draw_error)?;

    root.present().map_err(draw_error)?;
    Ok(())
}

fn draw_error<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Draw(err.to_string())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}
