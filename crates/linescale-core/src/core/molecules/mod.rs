//! Molecule identifier resolution.

pub mod hitran;
pub mod resolver;
