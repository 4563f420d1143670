//! # Core Module
//!
//! Stateless building blocks for equilibrium linestrength scaling.
//!
//! - **Line Representation** ([`models`]) - Typed line records and identifiers
//! - **Physics** ([`physics`]) - The scaling law and the radiation constants it depends on
//! - **Molecules** ([`molecules`]) - Resolution of numeric molecule ids to names
//! - **Partition Functions** ([`partition`]) - The provider capability plus tabulated
//!   and level-summation implementations
//! - **File I/O** ([`io`]) - Line list reading and scaled line list writing
//!
//! Nothing here holds state between calls; caching and orchestration live in
//! [`crate::engine`].

pub mod io;
pub mod models;
pub mod molecules;
pub mod partition;
pub mod physics;
