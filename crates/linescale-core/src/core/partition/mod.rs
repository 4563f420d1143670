//! Partition function providers: the capability trait and two reference implementations.

pub mod provider;
pub mod summation;
pub mod tabulated;
