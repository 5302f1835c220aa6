//! Parallel grid search over (θ0, a) with iterative zoom refinement.

use std::f64::consts::FRAC_PI_2;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, mpsc};

use balloon_config::{GridRegime, RefinementConfig};
use balloon_core::constants::TERMINAL_ANGLE_DEG;
use balloon_shape::{GridPoint, SolverError, Trajectory, TrajectorySolver};
use tracing::{debug, info, warn};

use super::grid::{self, GridBounds, GridResolution};

/// Boundary-condition tolerances for one depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub theta_deg: f64,
    pub radius: f64,
}

impl Tolerance {
    pub fn at_depth(refinement: &RefinementConfig, depth: usize) -> Self {
        Self {
            theta_deg: refinement.theta_tolerance_deg(depth),
            radius: refinement.radius_tolerance(depth),
        }
    }

    /// Loss of a trajectory whose terminal state lies inside the tolerance window.
    ///
    /// Returns `None` for infeasible trajectories.
    pub fn score(&self, trajectory: &Trajectory) -> Option<f64> {
        let theta_last = trajectory.last_theta()?;
        let r_last = trajectory.last_radius()?;
        let theta_deg = theta_last.to_degrees();

        let angle_ok = TERMINAL_ANGLE_DEG - self.theta_deg < theta_deg
            && theta_deg < TERMINAL_ANGLE_DEG + self.theta_deg;
        let radius_ok = -self.radius < r_last && r_last < self.radius;
        if !(angle_ok && radius_ok) {
            return None;
        }
        Some(boundary_loss(theta_last, r_last))
    }
}

/// Euclidean mismatch of the normalised terminal angle error and the terminal radius.
pub fn boundary_loss(theta_last: f64, r_last: f64) -> f64 {
    let angle_error = (FRAC_PI_2 + theta_last) / FRAC_PI_2;
    (angle_error * angle_error + r_last * r_last).sqrt()
}

/// Feasible grid point with its profile and loss.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub point: GridPoint,
    pub trajectory: Trajectory,
    pub loss: f64,
}

impl Candidate {
    pub fn max_radius(&self) -> f64 {
        self.trajectory.max_radius().unwrap_or(0.0)
    }
}

/// Result record of one dispatched task, carrying its originating grid point.
#[derive(Debug)]
pub struct Evaluation {
    pub point: GridPoint,
    pub outcome: Result<Trajectory, SolverError>,
}

/// Outcome of one depth's streaming minimum selection.
#[derive(Debug)]
pub enum Selection {
    Found(Candidate),
    NotFound { evaluated: usize, failed: usize },
}

/// Search window, tolerances and winner recorded for one refinement depth.
#[derive(Debug, Clone)]
pub struct RefinementState {
    pub depth: usize,
    pub bounds: GridBounds,
    pub tolerance: Tolerance,
    pub theta_step_deg: f64,
    pub a_step: f64,
    pub best: Candidate,
}

/// Winner of the final depth together with the per-depth history.
#[derive(Debug, Clone)]
pub struct RefinedSearch {
    pub states: Vec<RefinementState>,
    pub best: Candidate,
    pub max_radius: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("worker pool size must be at least 1")]
    InvalidWorkerCount,
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("grid for depth {depth} is empty ({bounds:?})")]
    EmptyGrid { depth: usize, bounds: GridBounds },
    #[error(
        "no feasible trajectory at depth {depth}: {evaluated} evaluated, {failed} solver failures"
    )]
    NoFeasibleTrajectory {
        depth: usize,
        evaluated: usize,
        failed: usize,
    },
}

/// Grid search engine dispatching shooting solves onto a fixed-size worker pool.
pub struct GridSearch<S> {
    solver: Arc<S>,
    pool: rayon::ThreadPool,
}

impl<S> GridSearch<S>
where
    S: TrajectorySolver + 'static,
{
    pub fn new(solver: Arc<S>, workers: usize) -> Result<Self, SearchError> {
        if workers == 0 {
            return Err(SearchError::InvalidWorkerCount);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("shape-worker-{index}"))
            .build()?;
        Ok(Self { solver, pool })
    }

    /// Submit every grid point to the pool and return the completion stream.
    ///
    /// All tasks are queued before the receiver is handed back; completions arrive in any order.
    fn dispatch(
        &self,
        grid: Vec<GridPoint>,
        max_radius: f64,
        velocity: f64,
    ) -> mpsc::Receiver<Evaluation> {
        let (tx, rx) = mpsc::channel();
        for point in grid {
            let tx = tx.clone();
            let solver = Arc::clone(&self.solver);
            self.pool.spawn_fifo(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    solver.solve(point, max_radius, velocity)
                }))
                .unwrap_or(Err(SolverError::Panicked))
                .and_then(Trajectory::validated);
                // The receiver only hangs up once the depth is abandoned.
                let _ = tx.send(Evaluation { point, outcome });
            });
        }
        rx
    }

    /// Streaming single-pass minimum over the completions of one grid.
    fn select(&self, completions: mpsc::Receiver<Evaluation>, tolerance: &Tolerance) -> Selection {
        let mut best: Option<Candidate> = None;
        let mut evaluated = 0usize;
        let mut failed = 0usize;

        for evaluation in completions {
            evaluated += 1;
            let trajectory = match evaluation.outcome {
                Ok(trajectory) => trajectory,
                Err(err) => {
                    failed += 1;
                    debug!(
                        theta0_deg = evaluation.point.theta0_deg(),
                        a = evaluation.point.shape_constant,
                        error = %err,
                        "trajectory solve failed"
                    );
                    continue;
                }
            };
            let Some(loss) = tolerance.score(&trajectory) else {
                continue;
            };
            if best.as_ref().is_none_or(|current| loss < current.loss) {
                debug!(
                    theta0_deg = evaluation.point.theta0_deg(),
                    a = evaluation.point.shape_constant,
                    loss,
                    "improved candidate"
                );
                best = Some(Candidate {
                    point: evaluation.point,
                    trajectory,
                    loss,
                });
            }
        }

        if failed > 0 {
            warn!(failed, evaluated, "solver failures excluded from selection");
        }

        match best {
            Some(candidate) => Selection::Found(candidate),
            None => Selection::NotFound { evaluated, failed },
        }
    }

    /// Evaluate one grid and return its best feasible candidate.
    pub fn evaluate(
        &self,
        depth: usize,
        bounds: &GridBounds,
        theta_step_deg: f64,
        a_step: f64,
        tolerance: &Tolerance,
        max_radius: f64,
        velocity: f64,
    ) -> Result<Candidate, SearchError> {
        let grid = grid::generate(bounds, theta_step_deg, a_step);
        if grid.is_empty() {
            return Err(SearchError::EmptyGrid {
                depth,
                bounds: *bounds,
            });
        }
        debug!(depth, points = grid.len(), "dispatching grid");

        let completions = self.dispatch(grid, max_radius, velocity);
        match self.select(completions, tolerance) {
            Selection::Found(candidate) => Ok(candidate),
            Selection::NotFound { evaluated, failed } => Err(SearchError::NoFeasibleTrajectory {
                depth,
                evaluated,
                failed,
            }),
        }
    }

    /// Run every refinement depth, zooming the window around each depth's winner.
    pub fn refine(
        &self,
        regime: &GridRegime,
        refinement: &RefinementConfig,
        max_radius: f64,
        velocity: f64,
    ) -> Result<RefinedSearch, SearchError> {
        let resolution = GridResolution::from(regime);
        let mut bounds = GridBounds::from(regime);
        let mut states: Vec<RefinementState> = Vec::with_capacity(refinement.depths);

        for depth in 0..refinement.depths {
            info!(max_radius, depth, "grid search depth");
            let tolerance = Tolerance::at_depth(refinement, depth);
            let (theta_step_deg, a_step) = resolution.steps_for(&bounds);

            let best = self.evaluate(
                depth,
                &bounds,
                theta_step_deg,
                a_step,
                &tolerance,
                max_radius,
                velocity,
            )?;
            debug!(
                depth,
                theta0_deg = best.point.theta0_deg(),
                a = best.point.shape_constant,
                loss = best.loss,
                "depth winner"
            );

            let next = GridBounds::around(&best.point, theta_step_deg, a_step);
            states.push(RefinementState {
                depth,
                bounds,
                tolerance,
                theta_step_deg,
                a_step,
                best,
            });
            bounds = next;
        }

        let best = states
            .last()
            .map(|state| state.best.clone())
            .ok_or(SearchError::EmptyGrid { depth: 0, bounds })?;
        let max_radius = best.max_radius();

        Ok(RefinedSearch {
            states,
            best,
            max_radius,
        })
    }
}
