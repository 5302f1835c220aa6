//! (θ0, a) grid generation shared by every refinement depth.

use balloon_config::GridRegime;
use balloon_shape::GridPoint;

/// Relative slack used when comparing an accumulated axis value against its exclusive lower bound.
const LOWER_BOUND_GUARD: f64 = 1e-9;

/// Current search window. Angles are kept in degrees; grid points carry radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    pub theta_min_deg: f64,
    pub theta_max_deg: f64,
    pub a_min: f64,
    pub a_max: f64,
}

impl GridBounds {
    pub fn theta_width_deg(&self) -> f64 {
        self.theta_max_deg - self.theta_min_deg
    }

    pub fn a_width(&self) -> f64 {
        self.a_max - self.a_min
    }

    /// Window straddling `center` by one grid step on each axis, padded by machine epsilon.
    pub fn around(center: &GridPoint, theta_step_deg: f64, a_step: f64) -> Self {
        let theta = center.theta0_deg();
        let a = center.shape_constant;
        Self {
            theta_min_deg: theta - theta_step_deg - f64::EPSILON,
            theta_max_deg: theta + theta_step_deg + f64::EPSILON,
            a_min: a - a_step - f64::EPSILON,
            a_max: a + a_step + f64::EPSILON,
        }
    }
}

impl From<&GridRegime> for GridBounds {
    fn from(regime: &GridRegime) -> Self {
        Self {
            theta_min_deg: regime.theta_min_deg,
            theta_max_deg: regime.theta_max_deg,
            a_min: regime.a_min,
            a_max: regime.a_max,
        }
    }
}

/// Number of cells along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridResolution {
    pub theta_steps: usize,
    pub a_steps: usize,
}

impl From<&GridRegime> for GridResolution {
    fn from(regime: &GridRegime) -> Self {
        Self {
            theta_steps: regime.theta_steps,
            a_steps: regime.a_steps,
        }
    }
}

impl GridResolution {
    /// Step sizes `(θ step in degrees, a step)` that split `bounds` into this resolution.
    pub fn steps_for(&self, bounds: &GridBounds) -> (f64, f64) {
        (
            bounds.theta_width_deg() / self.theta_steps as f64,
            bounds.a_width() / self.a_steps as f64,
        )
    }
}

/// Descending axis enumeration from `max` toward `min`, excluding `min`.
///
/// Values are computed as `max − k·step` rather than by repeated subtraction so the count does
/// not drift with accumulated rounding.
pub fn axis_values(max: f64, min: f64, step: f64) -> Vec<f64> {
    if !(step.is_finite() && step > 0.0 && max.is_finite() && min.is_finite()) || max <= min {
        return Vec::new();
    }
    let guard = step * LOWER_BOUND_GUARD;
    let mut values = Vec::new();
    let mut k = 0usize;
    loop {
        let value = max - k as f64 * step;
        if value <= min + guard {
            break;
        }
        values.push(value);
        k += 1;
    }
    values
}

/// Cross product of the θ0 and `a` axes, θ0 outer, both descending.
pub fn generate(bounds: &GridBounds, theta_step_deg: f64, a_step: f64) -> Vec<GridPoint> {
    let thetas = axis_values(bounds.theta_max_deg, bounds.theta_min_deg, theta_step_deg);
    let shape_constants = axis_values(bounds.a_max, bounds.a_min, a_step);

    let mut grid = Vec::with_capacity(thetas.len() * shape_constants.len());
    for theta_deg in &thetas {
        let theta0 = theta_deg.to_radians();
        for &a in &shape_constants {
            grid.push(GridPoint::new(theta0, a));
        }
    }
    grid
}
