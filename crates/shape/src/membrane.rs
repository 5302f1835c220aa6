//! Natural-shape membrane integrator.
//!
//! The meridian is integrated over arc length from the envelope start point. Hoop stress is
//! taken as zero, so the meridional tension carries the suspended load:
//! `2π·r·T·cos θ = L`. Normal equilibrium then gives the curvature
//! `dθ/ds = −Δp·2π·r·cos θ / L` with the differential pressure
//! `Δp = b·(z − a) − q·sin²θ`, where `b` is the buoyancy gradient, `a` the shape constant
//! (height of the zero-pressure level) and `q` the dynamic pressure acting on the crown.

use std::f64::consts::{FRAC_PI_2, PI};

use balloon_atmosphere::AtmosphereState;
use balloon_config::PhysicsConfig;

use crate::{GridPoint, SolverError, Trajectory, TrajectorySolver};

#[derive(Debug, Clone, Copy)]
struct State {
    z: f64,
    r: f64,
    theta: f64,
}

impl State {
    fn add_scaled(&self, k: &State, h: f64) -> State {
        State {
            z: self.z + h * k.z,
            r: self.r + h * k.r,
            theta: self.theta + h * k.theta,
        }
    }
}

/// Membrane shooting solver for one altitude.
#[derive(Debug, Clone)]
pub struct MembraneSolver {
    slice_thickness_m: f64,
    apex_radius_m: f64,
    buoyancy_pa_m: f64,
    air_density_kg_m3: f64,
    drag_coefficient: f64,
    meridional_load_n: f64,
    max_steps: usize,
}

struct Shot {
    buoyancy: f64,
    shape_constant: f64,
    crown_pressure: f64,
    load: f64,
}

impl Shot {
    fn rhs(&self, state: &State) -> State {
        let crown = if state.theta < 0.0 {
            self.crown_pressure * state.theta.sin().powi(2)
        } else {
            0.0
        };
        let dp = self.buoyancy * (state.z - self.shape_constant) - crown;
        let (sin_t, cos_t) = state.theta.sin_cos();
        State {
            z: cos_t,
            r: sin_t,
            theta: -dp * 2.0 * PI * state.r * cos_t / self.load,
        }
    }

    fn step(&self, state: State, h: f64) -> State {
        let h2 = 0.5 * h;
        let k1 = self.rhs(&state);
        let k2 = self.rhs(&state.add_scaled(&k1, h2));
        let k3 = self.rhs(&state.add_scaled(&k2, h2));
        let k4 = self.rhs(&state.add_scaled(&k3, h));
        State {
            z: state.z + h / 6.0 * (k1.z + 2.0 * k2.z + 2.0 * k3.z + k4.z),
            r: state.r + h / 6.0 * (k1.r + 2.0 * k2.r + 2.0 * k3.r + k4.r),
            theta: state.theta + h / 6.0 * (k1.theta + 2.0 * k2.theta + 2.0 * k3.theta + k4.theta),
        }
    }
}

impl MembraneSolver {
    pub fn new(physics: &PhysicsConfig, atmosphere: &AtmosphereState) -> Self {
        Self {
            slice_thickness_m: physics.slice_thickness_m,
            apex_radius_m: physics.apex_radius_m,
            buoyancy_pa_m: atmosphere.buoyancy_pa_m,
            air_density_kg_m3: atmosphere.density_kg_m3,
            drag_coefficient: physics.drag_coefficient,
            meridional_load_n: physics.suspended_mass_kg() * physics.gravity_m_s2,
            max_steps: physics.max_solver_steps,
        }
    }

    fn check_inputs(
        &self,
        point: &GridPoint,
        max_radius: f64,
        velocity: f64,
    ) -> Result<(), SolverError> {
        if !(point.theta0.is_finite() && point.shape_constant.is_finite()) {
            return Err(SolverError::InvalidInput(format!(
                "non-finite grid point (theta0={}, a={})",
                point.theta0, point.shape_constant
            )));
        }
        if !(max_radius.is_finite() && max_radius > 0.0) {
            return Err(SolverError::InvalidInput(format!(
                "max radius must be positive (got {max_radius})"
            )));
        }
        if !velocity.is_finite() {
            return Err(SolverError::InvalidInput("velocity is not finite".to_string()));
        }
        if self.meridional_load_n <= 0.0 || self.slice_thickness_m <= 0.0 {
            return Err(SolverError::InvalidInput(
                "load and slice thickness must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl TrajectorySolver for MembraneSolver {
    fn solve(
        &self,
        point: GridPoint,
        max_radius: f64,
        velocity: f64,
    ) -> Result<Trajectory, SolverError> {
        self.check_inputs(&point, max_radius, velocity)?;

        let dynamic_pressure =
            0.5 * self.air_density_kg_m3 * self.drag_coefficient * velocity * velocity.abs();
        let shot = Shot {
            buoyancy: self.buoyancy_pa_m,
            shape_constant: point.shape_constant,
            crown_pressure: dynamic_pressure,
            load: self.meridional_load_n,
        };

        let mut state = State {
            z: 0.0,
            r: self.apex_radius_m,
            theta: point.theta0,
        };
        let mut z = vec![state.z];
        let mut r = vec![state.r];
        let mut theta = vec![state.theta];

        for _ in 0..self.max_steps {
            state = shot.step(state, self.slice_thickness_m);
            z.push(state.z);
            r.push(state.r);
            theta.push(state.theta);

            if !(state.r.is_finite() && state.theta.is_finite()) {
                break;
            }
            if state.theta <= -FRAC_PI_2 || state.r <= 0.0 || state.r > max_radius {
                break;
            }
        }

        Trajectory { z, r, theta }.validated()
    }
}
