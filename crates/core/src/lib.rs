//! Core constants and shared primitives for the balloon equilibrium workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Standard gravity at Earth's surface (m/s²).
    pub const G0: f64 = 9.80665;
    /// Universal gas constant (J/(mol·K)).
    pub const UNIVERSAL_GAS_CONSTANT: f64 = 8.314_462_618;
    /// Specific gas constant for dry air (J/(kg·K)).
    pub const R_AIR: f64 = 287.0531;
    /// Molar mass of helium (kg/mol).
    pub const HELIUM_MOLAR_MASS: f64 = 4.002_602e-3;
    /// Terminal meridian angle of a closed envelope (degrees).
    pub const TERMINAL_ANGLE_DEG: f64 = -90.0;
}

/// Envelope geometry helpers.
pub mod geometry {
    use std::f64::consts::PI;

    /// Volume of one conic-frustum slice of the envelope.
    ///
    /// `ds` is the slice thickness along the meridian and `tilt_rad` the meridian
    /// angle measured from the axis, so the axial height of the slice is `ds·cos(tilt)`.
    #[inline]
    pub fn frustum_volume(ds: f64, tilt_rad: f64, r_upper: f64, r_lower: f64) -> f64 {
        PI / 3.0 * ds * tilt_rad.cos() * (r_upper * r_upper + r_upper * r_lower + r_lower * r_lower)
    }

    /// Largest value in a sample sequence, `None` when empty.
    pub fn max_sample(samples: &[f64]) -> Option<f64> {
        samples.iter().copied().fold(None, |acc, v| match acc {
            Some(current) if current >= v => Some(current),
            _ => Some(v),
        })
    }
}
