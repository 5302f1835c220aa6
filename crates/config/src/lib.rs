//! Configuration models and loaders for the balloon equilibrium calculator.

use std::fs::File;
use std::path::Path;

use balloon_core::constants::{G0, HELIUM_MOLAR_MASS, UNIVERSAL_GAS_CONSTANT};
use serde::Deserialize;
use thiserror::Error;

/// Complete run configuration threaded through every solver stage.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RunConfig {
    pub physics: PhysicsConfig,
    pub search: SearchConfig,
    pub convergence: ConvergenceConfig,
}

/// Physical constants of the balloon system and the shape integrator.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity_m_s2: f64,
    pub drag_coefficient: f64,
    pub payload_mass_kg: f64,
    pub balloon_mass_kg: f64,
    pub gas_molar_mass_kg_mol: f64,
    pub gas_constant_j_mol_k: f64,
    /// Meridian slice thickness shared by the shape integrator and the volume integration.
    pub slice_thickness_m: f64,
    pub apex_radius_m: f64,
    /// Lifting gas temperature offset above ambient.
    pub gas_superheat_k: f64,
    pub max_solver_steps: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_m_s2: G0,
            drag_coefficient: 0.3,
            payload_mass_kg: 40.0,
            balloon_mass_kg: 15.0,
            gas_molar_mass_kg_mol: HELIUM_MOLAR_MASS,
            gas_constant_j_mol_k: UNIVERSAL_GAS_CONSTANT,
            slice_thickness_m: 0.02,
            apex_radius_m: 0.05,
            gas_superheat_k: 0.0,
            max_solver_steps: 20_000,
        }
    }
}

impl PhysicsConfig {
    /// Mass carried by the envelope excluding lifting gas.
    pub fn suspended_mass_kg(&self) -> f64 {
        self.payload_mass_kg + self.balloon_mass_kg
    }
}

/// Search space for the (θ0, a) grid within one altitude regime.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GridRegime {
    pub theta_min_deg: f64,
    pub theta_max_deg: f64,
    pub a_min: f64,
    pub a_max: f64,
    pub theta_steps: usize,
    pub a_steps: usize,
}

impl GridRegime {
    /// Launch regime used below the altitude threshold.
    pub fn low_altitude() -> Self {
        Self {
            theta_min_deg: 0.0,
            theta_max_deg: 25.0,
            a_min: 5.0,
            a_max: 16.0,
            theta_steps: 250,
            a_steps: 50,
        }
    }

    /// Float regime used at or above the altitude threshold.
    pub fn high_altitude() -> Self {
        Self {
            theta_min_deg: 20.0,
            theta_max_deg: 90.0,
            a_min: -400.0,
            a_max: 5.1,
            theta_steps: 700,
            a_steps: 100,
        }
    }
}

/// Zoom schedule for the refinement depths.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RefinementConfig {
    pub depths: usize,
    pub theta_tol_deg: f64,
    pub theta_tol_ratio: f64,
    pub radius_tol: f64,
    pub radius_tol_ratio: f64,
    pub radius_tol_floor: f64,
    pub radius_floor_after_depth: usize,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            depths: 3,
            theta_tol_deg: 3.0,
            theta_tol_ratio: 1.2,
            radius_tol: 2.0,
            radius_tol_ratio: 2.0,
            radius_tol_floor: 1.0e-2,
            radius_floor_after_depth: 5,
        }
    }
}

impl RefinementConfig {
    /// Angle tolerance (degrees) applied at `depth`.
    pub fn theta_tolerance_deg(&self, depth: usize) -> f64 {
        self.theta_tol_deg / self.theta_tol_ratio.powi(depth as i32)
    }

    /// Terminal radius tolerance applied at `depth`.
    pub fn radius_tolerance(&self, depth: usize) -> f64 {
        if depth <= self.radius_floor_after_depth {
            self.radius_tol / self.radius_tol_ratio.powi(depth as i32)
        } else {
            self.radius_tol_floor
        }
    }
}

/// Altitude-dependent search configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub regime_threshold_m: f64,
    pub low: GridRegime,
    pub high: GridRegime,
    pub refinement: RefinementConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            regime_threshold_m: 21_500.0,
            low: GridRegime::low_altitude(),
            high: GridRegime::high_altitude(),
            refinement: RefinementConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Select the grid regime for an altitude.
    pub fn regime_for(&self, altitude_m: f64) -> &GridRegime {
        if altitude_m < self.regime_threshold_m {
            &self.low
        } else {
            &self.high
        }
    }
}

/// Tolerances, initial guesses and iteration caps of the two outer loops.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ConvergenceConfig {
    pub rmax_tol: f64,
    pub mgas_tol: f64,
    /// Accepted and reported; no termination test consumes it.
    pub velocity_tol: f64,
    pub initial_max_radius_m: f64,
    pub initial_velocity_m_s: f64,
    /// Gas mass entering the weight of the first equilibrium iteration.
    pub initial_gas_mass_kg: f64,
    pub max_radius_iterations: usize,
    pub max_equilibrium_iterations: usize,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            rmax_tol: 1.0e-2,
            mgas_tol: 1.0e-2,
            velocity_tol: 1.0e-2,
            initial_max_radius_m: 30.0,
            initial_velocity_m_s: 10.0,
            initial_gas_mass_kg: 0.0,
            max_radius_iterations: 50,
            max_equilibrium_iterations: 50,
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load a run configuration from a TOML or YAML file and validate it.
pub fn load_run_config<P: AsRef<Path>>(path: P) -> Result<RunConfig, ConfigError> {
    let path = path.as_ref();
    let config: RunConfig = if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)?
    } else {
        let reader = File::open(path)?;
        serde_yaml::from_reader(reader)?
    };
    config.validate()?;
    Ok(config)
}

impl RunConfig {
    /// Reject configurations the solver loops cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let physics = &self.physics;
        require_positive("physics.gravity_m_s2", physics.gravity_m_s2)?;
        require_positive("physics.drag_coefficient", physics.drag_coefficient)?;
        require_positive("physics.gas_molar_mass_kg_mol", physics.gas_molar_mass_kg_mol)?;
        require_positive("physics.gas_constant_j_mol_k", physics.gas_constant_j_mol_k)?;
        require_positive("physics.slice_thickness_m", physics.slice_thickness_m)?;
        require_positive("physics.apex_radius_m", physics.apex_radius_m)?;
        require_positive("physics.suspended mass", physics.suspended_mass_kg())?;
        if physics.max_solver_steps == 0 {
            return Err(invalid("physics.max_solver_steps must be at least 1"));
        }

        let regimes = [("search.low", &self.search.low), ("search.high", &self.search.high)];
        for (name, regime) in regimes {
            if regime.theta_steps == 0 || regime.a_steps == 0 {
                return Err(invalid(format!("{name} grid resolution must be non-zero")));
            }
            if regime.theta_max_deg <= regime.theta_min_deg || regime.a_max <= regime.a_min {
                return Err(invalid(format!("{name} bounds must satisfy max > min")));
            }
        }

        let refinement = &self.search.refinement;
        if refinement.depths == 0 {
            return Err(invalid("search.refinement.depths must be at least 1"));
        }
        if refinement.theta_tol_ratio < 1.0 || refinement.radius_tol_ratio < 1.0 {
            return Err(invalid("tolerance ratios must be >= 1 so tolerances never widen"));
        }
        require_positive("search.refinement.theta_tol_deg", refinement.theta_tol_deg)?;
        require_positive("search.refinement.radius_tol", refinement.radius_tol)?;
        require_positive("search.refinement.radius_tol_floor", refinement.radius_tol_floor)?;

        let convergence = &self.convergence;
        require_positive("convergence.rmax_tol", convergence.rmax_tol)?;
        require_positive("convergence.mgas_tol", convergence.mgas_tol)?;
        require_positive("convergence.initial_max_radius_m", convergence.initial_max_radius_m)?;
        if convergence.max_radius_iterations == 0 || convergence.max_equilibrium_iterations == 0 {
            return Err(invalid("iteration caps must be at least 1"));
        }
        Ok(())
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be positive (got {value})")))
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}
