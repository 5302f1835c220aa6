//! Layered standard atmosphere and the lifting-gas state derived from it.

use balloon_config::PhysicsConfig;
use balloon_core::constants::{G0, R_AIR};

/// Ambient and lifting-gas properties at one altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereState {
    pub density_kg_m3: f64,
    /// Hydrostatic pressure gradient between air and lifting gas, `(ρ_air − ρ_gas)·g`.
    pub buoyancy_pa_m: f64,
    pub pressure_pa: f64,
    pub gas_temperature_k: f64,
}

/// Altitude to ambient state mapping consumed by the equilibrium loops.
pub trait Atmosphere {
    fn state_at(&self, altitude_m: f64) -> AtmosphereState;
}

#[derive(Debug, Clone)]
struct AtmosphereLayer {
    base_altitude_m: f64,
    base_temperature_k: f64,
    base_pressure_pa: f64,
    /// K/m
    lapse_rate: f64,
}

const ICAO_LAYERS: &[AtmosphereLayer] = &[
    AtmosphereLayer {
        base_altitude_m: 0.0,
        base_temperature_k: 288.15,
        base_pressure_pa: 101_325.0,
        lapse_rate: -0.0065,
    },
    AtmosphereLayer {
        base_altitude_m: 11_000.0,
        base_temperature_k: 216.65,
        base_pressure_pa: 22_632.1,
        lapse_rate: 0.0,
    },
    AtmosphereLayer {
        base_altitude_m: 20_000.0,
        base_temperature_k: 216.65,
        base_pressure_pa: 5_474.89,
        lapse_rate: 0.001,
    },
    AtmosphereLayer {
        base_altitude_m: 32_000.0,
        base_temperature_k: 228.65,
        base_pressure_pa: 868.02,
        lapse_rate: 0.0028,
    },
    AtmosphereLayer {
        base_altitude_m: 47_000.0,
        base_temperature_k: 270.65,
        base_pressure_pa: 110.91,
        lapse_rate: 0.0,
    },
    AtmosphereLayer {
        base_altitude_m: 51_000.0,
        base_temperature_k: 270.65,
        base_pressure_pa: 66.94,
        lapse_rate: -0.0028,
    },
    AtmosphereLayer {
        base_altitude_m: 71_000.0,
        base_temperature_k: 214.65,
        base_pressure_pa: 3.96,
        lapse_rate: -0.002,
    },
];

const MAX_ALTITUDE_M: f64 = 84_000.0;

/// ICAO standard atmosphere with a lifting gas in thermal equilibrium (plus optional superheat).
#[derive(Debug, Clone)]
pub struct StandardAtmosphere {
    pub gravity_m_s2: f64,
    pub gas_molar_mass_kg_mol: f64,
    pub gas_constant_j_mol_k: f64,
    pub gas_superheat_k: f64,
}

impl StandardAtmosphere {
    pub fn from_physics(physics: &PhysicsConfig) -> Self {
        Self {
            gravity_m_s2: physics.gravity_m_s2,
            gas_molar_mass_kg_mol: physics.gas_molar_mass_kg_mol,
            gas_constant_j_mol_k: physics.gas_constant_j_mol_k,
            gas_superheat_k: physics.gas_superheat_k,
        }
    }

    /// Temperature (K) and pressure (Pa) of the layered model. Altitude is clamped to 0–84 km.
    pub fn temperature_pressure(altitude_m: f64) -> (f64, f64) {
        let altitude = altitude_m.clamp(0.0, MAX_ALTITUDE_M);
        let layer = ICAO_LAYERS
            .iter()
            .rev()
            .find(|layer| altitude >= layer.base_altitude_m)
            .unwrap_or(&ICAO_LAYERS[0]);

        let dh = altitude - layer.base_altitude_m;
        let temperature = layer.base_temperature_k + layer.lapse_rate * dh;
        let pressure = if layer.lapse_rate.abs() < 1e-10 {
            layer.base_pressure_pa * (-G0 * dh / (R_AIR * layer.base_temperature_k)).exp()
        } else {
            let ratio = temperature / layer.base_temperature_k;
            layer.base_pressure_pa * ratio.powf(-G0 / (layer.lapse_rate * R_AIR))
        };
        (temperature, pressure)
    }
}

impl Atmosphere for StandardAtmosphere {
    fn state_at(&self, altitude_m: f64) -> AtmosphereState {
        let (temperature, pressure) = Self::temperature_pressure(altitude_m);
        let density = pressure / (R_AIR * temperature);
        let gas_temperature = temperature + self.gas_superheat_k;
        let gas_density =
            pressure * self.gas_molar_mass_kg_mol / (self.gas_constant_j_mol_k * gas_temperature);

        AtmosphereState {
            density_kg_m3: density,
            buoyancy_pa_m: (density - gas_density) * self.gravity_m_s2,
            pressure_pa: pressure,
            gas_temperature_k: gas_temperature,
        }
    }
}
