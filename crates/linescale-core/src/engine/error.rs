use super::config::ConfigError;
use crate::core::models::ids::{IsotopologueId, MoleculeId};
use crate::core::molecules::resolver::ResolveError;
use crate::core::partition::provider::PartitionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("Invalid {which} temperature: {value} K (must be positive and finite)")]
    InvalidTemperature { which: &'static str, value: f64 },

    #[error("Cannot scale an empty line set")]
    EmptyLineSet,

    #[error(
        "Line {index} belongs to molecule {found} but the batch is molecule {expected}; partition mixed tables by molecule first"
    )]
    MixedMolecules {
        index: usize,
        expected: MoleculeId,
        found: MoleculeId,
    },

    #[error("Unknown molecule id {molecule_id}")]
    UnknownMolecule { molecule_id: MoleculeId },

    #[error(
        "Missing partition function for {molecule} isotopologue {isotopologue} at {temperature} K: {source}"
    )]
    MissingPartitionFunction {
        molecule: String,
        isotopologue: IsotopologueId,
        temperature: f64,
        #[source]
        source: PartitionError,
    },

    #[error(
        "Partition function for {molecule} isotopologue {isotopologue} at {temperature} K is non-positive ({value})"
    )]
    InvalidPartitionFunction {
        molecule: String,
        isotopologue: IsotopologueId,
        temperature: f64,
        value: f64,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl From<ResolveError> for ScaleError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::UnknownMolecule(molecule_id) => Self::UnknownMolecule { molecule_id },
        }
    }
}
