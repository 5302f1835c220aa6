//! Middle loop: fixed point on the maximum envelope radius bounding the shape integration.

use balloon_config::{ConvergenceConfig, GridRegime, RefinementConfig};
use balloon_shape::TrajectorySolver;
use tracing::{info, warn};

use super::convergence::Convergence;
use super::search::{GridSearch, RefinedSearch, SearchError};

/// Last radius iteration: the trial radius it ran with and the radius its winner reached.
#[derive(Debug, Clone)]
pub struct RadiusSolution {
    pub iterations: usize,
    pub trial_radius: f64,
    pub observed_radius: f64,
    pub search: RefinedSearch,
}

impl RadiusSolution {
    /// Signed gap tested against `rmax_tol`.
    pub fn residual(&self) -> f64 {
        self.trial_radius - self.observed_radius
    }
}

/// Iterate full refined searches until the observed maximum radius stops shrinking the trial.
///
/// Each iteration starts again from the regime's full grid bounds. The test is signed: a winner
/// that grows beyond the trial radius terminates the loop immediately.
pub fn converge_radius<S>(
    search: &GridSearch<S>,
    regime: &GridRegime,
    refinement: &RefinementConfig,
    settings: &ConvergenceConfig,
    velocity: f64,
) -> Result<Convergence<RadiusSolution>, SearchError>
where
    S: TrajectorySolver + 'static,
{
    let mut trial_radius = settings.initial_max_radius_m;
    let mut iteration = 0usize;

    loop {
        iteration += 1;
        let refined = search.refine(regime, refinement, trial_radius, velocity)?;
        let observed_radius = refined.max_radius;
        info!(
            iteration,
            trial_radius, observed_radius, velocity, "radius iteration"
        );

        let solution = RadiusSolution {
            iterations: iteration,
            trial_radius,
            observed_radius,
            search: refined,
        };

        if solution.residual() <= settings.rmax_tol {
            return Ok(Convergence::Converged(solution));
        }
        if iteration >= settings.max_radius_iterations {
            warn!(
                iterations = iteration,
                residual = solution.residual(),
                "radius loop hit its iteration cap"
            );
            return Ok(Convergence::ExceededIterations(solution));
        }
        trial_radius = observed_radius;
    }
}
