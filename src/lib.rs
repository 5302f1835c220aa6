//! Balloon envelope equilibrium calculator.
//!
//! The numerical work lives in the member crates; this crate re-exports them under short names
//! and hosts the profile plotting shared by the binaries.

pub mod plot;

pub use balloon_atmosphere as atmosphere;
pub use balloon_config as config;
pub use balloon_core as physics;
pub use balloon_export as export;
pub use balloon_shape as shape;
pub use balloon_solver as solver;
