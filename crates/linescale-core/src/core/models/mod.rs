//! Typed records for spectral lines and the identifiers that group them.

pub mod ids;
pub mod line;
