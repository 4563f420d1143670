//! # Engine Module
//!
//! Stateful orchestration of linestrength scaling.
//!
//! - **Scaling** ([`scaler`]) - Groups lines by isotopologue, resolves partition
//!   functions through the cache and applies the equilibrium scaling law
//! - **Caching** ([`cache`]) - Compute-once memoization of partition function values
//! - **Configuration** ([`config`]) - Temperatures and physical constants for a run
//! - **Progress Monitoring** ([`progress`]) - Optional progress callbacks
//! - **Error Handling** ([`error`]) - The scaling error taxonomy

pub mod cache;
pub mod config;
pub mod error;
pub mod progress;
pub mod scaler;
