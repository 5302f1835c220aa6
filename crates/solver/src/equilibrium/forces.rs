//! Vertical force balance and the drag-limited velocity it implies.

use std::f64::consts::PI;

use balloon_atmosphere::AtmosphereState;
use balloon_config::PhysicsConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceBalance {
    /// Total weight including the lifting gas (N).
    pub weight_n: f64,
    pub buoyancy_n: f64,
    /// `buoyancy − weight`
    pub net_lift_n: f64,
    pub velocity_m_s: f64,
    pub drag_n: f64,
    /// Net lift plus drag. Zero up to rounding when the velocity is the drag-equilibrium one.
    pub residual_n: f64,
}

impl ForceBalance {
    /// Balance for an envelope of `volume_m3` carrying `gas_mass_kg`, with drag acting on the
    /// cross-section of radius `max_radius_m`.
    pub fn compute(
        physics: &PhysicsConfig,
        atmosphere: &AtmosphereState,
        volume_m3: f64,
        gas_mass_kg: f64,
        max_radius_m: f64,
    ) -> Self {
        let g = physics.gravity_m_s2;
        let rho = atmosphere.density_kg_m3;
        let area = PI * max_radius_m * max_radius_m;

        let weight_n = (physics.suspended_mass_kg() + gas_mass_kg) * g;
        let buoyancy_n = rho * volume_m3 * g;
        let net_lift_n = buoyancy_n - weight_n;

        let drag_factor = physics.drag_coefficient * rho * area;
        let velocity_m_s = if drag_factor > 0.0 && net_lift_n != 0.0 {
            net_lift_n.signum() * (2.0 * net_lift_n.abs() / drag_factor).sqrt()
        } else {
            0.0
        };
        let drag_n = -drag_factor * velocity_m_s * velocity_m_s.abs() / 2.0;

        Self {
            weight_n,
            buoyancy_n,
            net_lift_n,
            velocity_m_s,
            drag_n,
            residual_n: net_lift_n + drag_n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sea_level() -> AtmosphereState {
        AtmosphereState {
            density_kg_m3: 1.225,
            buoyancy_pa_m: 10.0,
            pressure_pa: 101_325.0,
            gas_temperature_k: 288.15,
        }
    }

    #[test]
    fn heavy_envelope_sinks() {
        let physics = PhysicsConfig::default();
        let balance = ForceBalance::compute(&physics, &sea_level(), 1.0, 0.0, 1.0);
        assert!(balance.net_lift_n < 0.0);
        assert!(balance.velocity_m_s < 0.0);
        assert!(balance.drag_n > 0.0);
        assert!(balance.residual_n.abs() < 1e-9);
    }

    #[test]
    fn neutral_buoyancy_is_at_rest() {
        let physics = PhysicsConfig::default();
        let atmosphere = sea_level();
        let volume = physics.suspended_mass_kg() / atmosphere.density_kg_m3;
        let balance = ForceBalance::compute(&physics, &atmosphere, volume, 0.0, 3.0);
        assert!(balance.velocity_m_s.abs() < 1e-6);
    }
}
