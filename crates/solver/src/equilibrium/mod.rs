//! Equilibrium orchestrator nesting the gas-mass loop, the radius loop and the refined grid search.

pub mod convergence;
pub mod forces;
pub mod grid;
pub mod integrate;
pub mod radius;
pub mod search;

use self::convergence::Convergence;
use self::forces::ForceBalance;
use self::integrate::EnvelopeIntegral;
use self::radius::RadiusSolution;
use self::search::{GridSearch, SearchError};
use balloon_atmosphere::AtmosphereState;
use balloon_config::RunConfig;
use balloon_shape::TrajectorySolver;
use tracing::{info, warn};

/// State of the last equilibrium iteration.
#[derive(Debug, Clone)]
pub struct EquilibriumSolution {
    pub altitude_m: f64,
    pub atmosphere: AtmosphereState,
    pub radius: RadiusSolution,
    pub envelope: EnvelopeIntegral,
    pub forces: ForceBalance,
    /// Velocity the shape was solved with.
    pub trial_velocity_m_s: f64,
    /// Gas mass entering the weight of this iteration.
    pub trial_gas_mass_kg: f64,
    pub iterations: usize,
}

impl EquilibriumSolution {
    /// `|integrated − trial|` gas mass, the quantity tested against `mgas_tol`.
    pub fn gas_mass_residual(&self) -> f64 {
        (self.envelope.gas_mass_kg - self.trial_gas_mass_kg).abs()
    }

    /// Change of velocity produced by this iteration. Reported only.
    pub fn velocity_residual(&self) -> f64 {
        (self.forces.velocity_m_s - self.trial_velocity_m_s).abs()
    }

    /// Largest radius of the winning profile. Drag uses the trial radius instead.
    pub fn max_radius_m(&self) -> f64 {
        self.radius.observed_radius
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EquilibriumError {
    #[error("grid search failed: {0}")]
    Search(#[from] SearchError),
    #[error(
        "radius loop did not converge within {iterations} iterations \
         (trial {trial_radius:.4} m, observed {observed_radius:.4} m)"
    )]
    RadiusNotConverged {
        iterations: usize,
        trial_radius: f64,
        observed_radius: f64,
    },
}

/// Iterate shape, volume and force balance until the integrated gas mass matches the trial mass.
pub fn solve_equilibrium<S>(
    search: &GridSearch<S>,
    config: &RunConfig,
    atmosphere: &AtmosphereState,
    altitude_m: f64,
) -> Result<Convergence<EquilibriumSolution>, EquilibriumError>
where
    S: TrajectorySolver + 'static,
{
    let settings = &config.convergence;
    let regime = config.search.regime_for(altitude_m);
    let mut trial_velocity = settings.initial_velocity_m_s;
    let mut trial_gas_mass = settings.initial_gas_mass_kg;
    let mut iteration = 0usize;

    loop {
        iteration += 1;
        info!(
            iteration,
            trial_velocity, trial_gas_mass, "equilibrium iteration"
        );

        let radius = match radius::converge_radius(
            search,
            regime,
            &config.search.refinement,
            settings,
            trial_velocity,
        )? {
            Convergence::Converged(radius) => radius,
            Convergence::ExceededIterations(radius) => {
                return Err(EquilibriumError::RadiusNotConverged {
                    iterations: radius.iterations,
                    trial_radius: radius.trial_radius,
                    observed_radius: radius.observed_radius,
                });
            }
        };

        let best = &radius.search.best;
        let envelope = integrate::envelope(
            &best.trajectory,
            best.point.theta0,
            best.point.shape_constant,
            atmosphere,
            &config.physics,
        );
        let forces = ForceBalance::compute(
            &config.physics,
            atmosphere,
            envelope.volume_m3,
            trial_gas_mass,
            radius.trial_radius,
        );
        info!(
            iteration,
            volume_m3 = envelope.volume_m3,
            gas_mass_kg = envelope.gas_mass_kg,
            velocity_m_s = forces.velocity_m_s,
            residual_n = forces.residual_n,
            "force balance"
        );

        let solution = EquilibriumSolution {
            altitude_m,
            atmosphere: *atmosphere,
            radius,
            envelope,
            forces,
            trial_velocity_m_s: trial_velocity,
            trial_gas_mass_kg: trial_gas_mass,
            iterations: iteration,
        };

        if solution.gas_mass_residual() <= settings.mgas_tol {
            return Ok(Convergence::Converged(solution));
        }
        if iteration >= settings.max_equilibrium_iterations {
            warn!(
                iterations = iteration,
                residual = solution.gas_mass_residual(),
                "equilibrium loop hit its iteration cap"
            );
            return Ok(Convergence::ExceededIterations(solution));
        }
        trial_velocity = solution.forces.velocity_m_s;
        trial_gas_mass = solution.envelope.gas_mass_kg;
    }
}
