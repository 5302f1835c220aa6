//! Deterministic trajectory solvers standing in for the membrane integrator.
#![allow(dead_code)]

use std::f64::consts::FRAC_PI_2;

use balloon_equilibrium::config::{GridRegime, RefinementConfig};
use balloon_equilibrium::shape::{GridPoint, SolverError, Trajectory, TrajectorySolver};

/// Three-sample profile closing at the given terminal state and bulging to `r_max`.
pub fn closing_trajectory(theta_last: f64, r_last: f64, r_max: f64) -> Trajectory {
    Trajectory {
        z: vec![0.0, 0.5, 1.0],
        r: vec![0.05, r_max, r_last],
        theta: vec![0.3, 0.0, theta_last],
    }
}

pub fn coarse_regime() -> GridRegime {
    GridRegime {
        theta_min_deg: 0.0,
        theta_max_deg: 25.0,
        a_min: 5.0,
        a_max: 16.0,
        theta_steps: 25,
        a_steps: 11,
    }
}

pub fn default_refinement() -> RefinementConfig {
    RefinementConfig::default()
}

/// Terminal errors grow linearly with the distance from `target`.
#[derive(Debug, Clone)]
pub struct BowlSolver {
    pub target: GridPoint,
    pub r_max: f64,
}

impl BowlSolver {
    pub fn new(theta0_deg: f64, shape_constant: f64) -> Self {
        Self {
            target: GridPoint::new(theta0_deg.to_radians(), shape_constant),
            r_max: 3.0,
        }
    }
}

impl TrajectorySolver for BowlSolver {
    fn solve(
        &self,
        point: GridPoint,
        _max_radius: f64,
        _velocity: f64,
    ) -> Result<Trajectory, SolverError> {
        let theta_last = -FRAC_PI_2 + (point.theta0 - self.target.theta0);
        let r_last = (point.shape_constant - self.target.shape_constant) * 0.01;
        Ok(closing_trajectory(theta_last, r_last, self.r_max))
    }
}

/// Every point closes perfectly with the same loss.
#[derive(Debug, Clone)]
pub struct ConstantSolver {
    pub r_max: f64,
}

impl TrajectorySolver for ConstantSolver {
    fn solve(
        &self,
        _point: GridPoint,
        _max_radius: f64,
        _velocity: f64,
    ) -> Result<Trajectory, SolverError> {
        Ok(closing_trajectory(-FRAC_PI_2, 0.0, self.r_max))
    }
}

/// Never reaches the terminal angle.
#[derive(Debug, Clone)]
pub struct OpenSolver;

impl TrajectorySolver for OpenSolver {
    fn solve(
        &self,
        _point: GridPoint,
        _max_radius: f64,
        _velocity: f64,
    ) -> Result<Trajectory, SolverError> {
        Ok(closing_trajectory(0.0, 1.0, 3.0))
    }
}

/// Bowl solver that errors above `a = 12` and panics above 20°.
#[derive(Debug, Clone)]
pub struct FlakySolver {
    pub inner: BowlSolver,
}

impl TrajectorySolver for FlakySolver {
    fn solve(
        &self,
        point: GridPoint,
        max_radius: f64,
        velocity: f64,
    ) -> Result<Trajectory, SolverError> {
        if point.theta0_deg() > 20.0 {
            panic!("integrator blew up");
        }
        if point.shape_constant > 12.0 {
            return Err(SolverError::InvalidInput("shape constant out of range".into()));
        }
        self.inner.solve(point, max_radius, velocity)
    }
}

/// Maximum radius is a function of the trial radius the search runs with.
#[derive(Debug, Clone)]
pub struct RadiusSolver {
    pub observe: fn(f64) -> f64,
}

impl TrajectorySolver for RadiusSolver {
    fn solve(
        &self,
        _point: GridPoint,
        max_radius: f64,
        _velocity: f64,
    ) -> Result<Trajectory, SolverError> {
        Ok(closing_trajectory(-FRAC_PI_2, 0.0, (self.observe)(max_radius)))
    }
}

/// Cylinder of radius `radius` closed by a final cone slice, independent of every input.
#[derive(Debug, Clone)]
pub struct CylinderSolver {
    pub radius: f64,
    pub slices: usize,
    pub ds: f64,
}

impl CylinderSolver {
    pub fn trajectory(&self) -> Trajectory {
        let mut z = Vec::with_capacity(self.slices + 2);
        let mut r = Vec::with_capacity(self.slices + 2);
        let mut theta = Vec::with_capacity(self.slices + 2);
        for i in 0..=self.slices {
            z.push(i as f64 * self.ds);
            r.push(self.radius);
            theta.push(0.0);
        }
        z.push((self.slices + 1) as f64 * self.ds);
        r.push(0.0);
        theta.push(-FRAC_PI_2);
        Trajectory { z, r, theta }
    }
}

impl TrajectorySolver for CylinderSolver {
    fn solve(
        &self,
        _point: GridPoint,
        _max_radius: f64,
        _velocity: f64,
    ) -> Result<Trajectory, SolverError> {
        Ok(self.trajectory())
    }
}
