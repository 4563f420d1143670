use crate::core::models::ids::IsotopologueId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PartitionError {
    #[error("No partition function data for {molecule} isotopologue {isotopologue}")]
    UnsupportedIsotopologue {
        molecule: String,
        isotopologue: IsotopologueId,
    },

    #[error("Temperature {temperature} K is outside the valid range [{min}, {max}] K")]
    TemperatureOutOfRange { temperature: f64, min: f64, max: f64 },

    #[error("Partition function evaluated to a non-positive value ({value}) at {temperature} K")]
    NonPositive { value: f64, temperature: f64 },
}

/// Source of total internal partition functions `Q(T)` for individual isotopologues.
///
/// Implementations may be slow (table files, level sums over millions of states);
/// callers are expected to memoize through [`crate::engine::cache::PartitionCache`].
/// Failures must be reported, never papered over with a default value.
pub trait PartitionFunctionProvider: Send + Sync {
    fn at(
        &self,
        molecule: &str,
        isotopologue: IsotopologueId,
        temperature: f64,
    ) -> Result<f64, PartitionError>;
}

impl<P: PartitionFunctionProvider + ?Sized> PartitionFunctionProvider for &P {
    fn at(
        &self,
        molecule: &str,
        isotopologue: IsotopologueId,
        temperature: f64,
    ) -> Result<f64, PartitionError> {
        (**self).at(molecule, isotopologue, temperature)
    }
}

impl<P: PartitionFunctionProvider + ?Sized> PartitionFunctionProvider for Box<P> {
    fn at(
        &self,
        molecule: &str,
        isotopologue: IsotopologueId,
        temperature: f64,
    ) -> Result<f64, PartitionError> {
        (**self).at(molecule, isotopologue, temperature)
    }
}
