//! Re-exported APIs for consumers of the solver crate.

pub use crate::equilibrium::convergence::Convergence;
pub use crate::equilibrium::forces::ForceBalance;
pub use crate::equilibrium::grid::{GridBounds, GridResolution};
pub use crate::equilibrium::integrate::{EnvelopeIntegral, envelope};
pub use crate::equilibrium::radius::{RadiusSolution, converge_radius};
pub use crate::equilibrium::search::{
    Candidate, Evaluation, GridSearch, RefinedSearch, RefinementState, SearchError, Selection,
    Tolerance, boundary_loss,
};
pub use crate::equilibrium::{EquilibriumError, EquilibriumSolution, solve_equilibrium};

use std::sync::Arc;

use balloon_atmosphere::{Atmosphere, AtmosphereState, StandardAtmosphere};
use balloon_config::RunConfig;
use balloon_shape::MembraneSolver;

/// Everything needed to run one altitude with the standard atmosphere and the membrane solver.
pub struct EquilibriumRun {
    pub altitude_m: f64,
    pub atmosphere: AtmosphereState,
    pub search: GridSearch<MembraneSolver>,
}

impl EquilibriumRun {
    pub fn new(config: &RunConfig, altitude_m: f64, workers: usize) -> Result<Self, SearchError> {
        let atmosphere = StandardAtmosphere::from_physics(&config.physics).state_at(altitude_m);
        let solver = Arc::new(MembraneSolver::new(&config.physics, &atmosphere));
        let search = GridSearch::new(solver, workers)?;
        Ok(Self {
            altitude_m,
            atmosphere,
            search,
        })
    }

    pub fn solve(
        &self,
        config: &RunConfig,
    ) -> Result<Convergence<EquilibriumSolution>, EquilibriumError> {
        solve_equilibrium(&self.search, config, &self.atmosphere, self.altitude_m)
    }
}
