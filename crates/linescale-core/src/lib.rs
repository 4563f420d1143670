//! # linescale
//!
//! Equilibrium temperature scaling of spectroscopic linestrengths.
//!
//! Line lists such as HITRAN and HITEMP tabulate line intensities at a reference
//! temperature (296 K). This library rescales them to an arbitrary gas
//! temperature with the standard Boltzmann law: a partition function ratio, a
//! lower-state population factor and a stimulated-emission correction.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Typed line records, the closed-form scaling law,
//!   the molecule resolver and partition function provider capabilities with
//!   reference implementations, and line list I/O.
//!
//! - **[`engine`]: The Logic Core.** The `LinestrengthScaler`, which groups lines by
//!   isotopologue and memoizes partition function lookups in a thread-safe cache.
//!
//! - **[`workflows`]: The Public API.** End-to-end scaling of complete, possibly
//!   mixed-molecule, line lists.

pub mod core;
pub mod engine;
pub mod workflows;
