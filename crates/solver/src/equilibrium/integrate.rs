//! Volume and lifting-gas mass integrated slice by slice along a winning profile.

use balloon_atmosphere::AtmosphereState;
use balloon_config::PhysicsConfig;
use balloon_core::geometry::frustum_volume;
use balloon_shape::Trajectory;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeIntegral {
    pub volume_m3: f64,
    pub gas_mass_kg: f64,
}

/// Sum frustum slices between consecutive radius samples.
///
/// The slice between samples 0 and 1 takes its tilt from `theta0` and counts toward the volume
/// only. Every later slice between `i − 1` and `i` takes `theta[i − 1]` and carries gas at the
/// density of `z[i]`, with the hydrostatic offset measured from the shape constant.
pub fn envelope(
    trajectory: &Trajectory,
    theta0: f64,
    shape_constant: f64,
    atmosphere: &AtmosphereState,
    physics: &PhysicsConfig,
) -> EnvelopeIntegral {
    let ds = physics.slice_thickness_m;
    let molar_ratio = physics.gas_molar_mass_kg_mol
        / (physics.gas_constant_j_mol_k * atmosphere.gas_temperature_k);
    let gas_density = |z: f64| {
        (atmosphere.pressure_pa + atmosphere.buoyancy_pa_m * (z - shape_constant)) * molar_ratio
    };

    let mut volume_m3 = 0.0;
    let mut gas_mass_kg = 0.0;
    for i in 1..trajectory.len() {
        let tilt = if i == 1 {
            theta0
        } else {
            trajectory.theta[i - 1]
        };
        let slice = frustum_volume(ds, tilt, trajectory.r[i - 1], trajectory.r[i]);
        volume_m3 += slice;
        if i >= 2 {
            gas_mass_kg += slice * gas_density(trajectory.z[i]);
        }
    }

    EnvelopeIntegral {
        volume_m3,
        gas_mass_kg,
    }
}
