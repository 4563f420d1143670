//! Closed-form equilibrium linestrength temperature scaling and the constants it uses.

pub mod constants;
pub mod scaling;
