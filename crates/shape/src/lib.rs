//! Envelope meridian profiles and the shooting integrators that produce them.

pub mod membrane;

pub use membrane::MembraneSolver;

use balloon_core::geometry::max_sample;
use thiserror::Error;

/// One cell of the (θ0, a) search grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    /// Initial meridian tilt (radians).
    pub theta0: f64,
    pub shape_constant: f64,
}

impl GridPoint {
    pub fn new(theta0: f64, shape_constant: f64) -> Self {
        Self {
            theta0,
            shape_constant,
        }
    }

    pub fn theta0_deg(&self) -> f64 {
        self.theta0.to_degrees()
    }
}

/// Meridian samples of one candidate envelope, index-aligned from the start of integration.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub z: Vec<f64>,
    pub r: Vec<f64>,
    /// Tilt angle of the meridian (radians).
    pub theta: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    /// Terminal tilt angle (radians).
    pub fn last_theta(&self) -> Option<f64> {
        self.theta.last().copied()
    }

    pub fn last_radius(&self) -> Option<f64> {
        self.r.last().copied()
    }

    /// Largest radius over the profile.
    pub fn max_radius(&self) -> Option<f64> {
        max_sample(&self.r)
    }

    /// Accept only profiles usable downstream: non-empty, index-aligned and finite.
    pub fn validated(self) -> Result<Self, SolverError> {
        if self.is_empty() {
            return Err(SolverError::EmptyProfile);
        }
        if self.z.len() != self.r.len() || self.theta.len() != self.r.len() {
            return Err(SolverError::MismatchedLengths {
                z: self.z.len(),
                r: self.r.len(),
                theta: self.theta.len(),
            });
        }
        let non_finite = self
            .z
            .iter()
            .zip(&self.r)
            .zip(&self.theta)
            .position(|((z, r), t)| !(z.is_finite() && r.is_finite() && t.is_finite()));
        if let Some(index) = non_finite {
            return Err(SolverError::NonFinite { index });
        }
        Ok(self)
    }
}

/// Failure of a single shooting solve.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("solver produced an empty profile")]
    EmptyProfile,
    #[error("profile arrays are not index-aligned (z={z}, r={r}, theta={theta})")]
    MismatchedLengths { z: usize, r: usize, theta: usize },
    #[error("profile contains a non-finite sample at index {index}")]
    NonFinite { index: usize },
    #[error("invalid solver input: {0}")]
    InvalidInput(String),
    #[error("solver panicked")]
    Panicked,
}

/// Produces one envelope profile for a grid point, trial maximum radius and trial velocity.
///
/// Implementations must be deterministic and free of shared mutable state; the grid search
/// calls them concurrently from its worker pool.
pub trait TrajectorySolver: Send + Sync {
    fn solve(
        &self,
        point: GridPoint,
        max_radius: f64,
        velocity: f64,
    ) -> Result<Trajectory, SolverError>;
}

impl<S: TrajectorySolver + ?Sized> TrajectorySolver for std::sync::Arc<S> {
    fn solve(
        &self,
        point: GridPoint,
        max_radius: f64,
        velocity: f64,
    ) -> Result<Trajectory, SolverError> {
        (**self).solve(point, max_radius, velocity)
    }
}
