//! Equilibrium solver crate: parallel shape search nested inside the radius and gas-mass loops.

pub mod equilibrium;

pub use facade::*;

mod facade;
