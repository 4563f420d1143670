use crate::core::models::ids::MoleculeId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unknown molecule id {0}")]
    UnknownMolecule(MoleculeId),
}

/// Maps numeric molecule identifiers to the names partition function providers are keyed by.
pub trait MoleculeResolver: Send + Sync {
    fn resolve(&self, molecule_id: MoleculeId) -> Result<String, ResolveError>;
}

impl<R: MoleculeResolver + ?Sized> MoleculeResolver for &R {
    fn resolve(&self, molecule_id: MoleculeId) -> Result<String, ResolveError> {
        (**self).resolve(molecule_id)
    }
}
