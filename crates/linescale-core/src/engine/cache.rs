use crate::core::models::ids::IsotopologueId;
use crate::core::partition::provider::{PartitionError, PartitionFunctionProvider};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// Temperatures are keyed by bit pattern; callers only ever pass validated positive values.
type CacheKey = (String, IsotopologueId, u64);

/// Memoized partition function values keyed by (molecule, isotopologue, temperature).
///
/// Each key is computed at most once even under concurrent lookups: the map lock
/// is held only long enough to fetch the key's cell, and the provider call then
/// runs inside that cell's one-time initializer, so lookups for different
/// isotopologues never serialize on each other. A failed computation leaves the
/// cell empty and is retried by the next lookup.
#[derive(Debug, Default)]
pub struct PartitionCache {
    entries: Mutex<HashMap<CacheKey, Arc<OnceCell<f64>>>>,
}

impl PartitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<P>(
        &self,
        provider: &P,
        molecule: &str,
        isotopologue: IsotopologueId,
        temperature: f64,
    ) -> Result<f64, PartitionError>
    where
        P: PartitionFunctionProvider + ?Sized,
    {
        let cell = self
            .lock()
            .entry((molecule.to_string(), isotopologue, temperature.to_bits()))
            .or_default()
            .clone();

        cell.get_or_try_init(|| {
            trace!(%molecule, %isotopologue, temperature, "Querying partition function provider.");
            provider.at(molecule, isotopologue, temperature)
        })
        .copied()
    }

    pub fn get(
        &self,
        molecule: &str,
        isotopologue: IsotopologueId,
        temperature: f64,
    ) -> Option<f64> {
        self.lock()
            .get(&(molecule.to_string(), isotopologue, temperature.to_bits()))
            .and_then(|cell| cell.get().copied())
    }

    /// Number of computed values.
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<OnceCell<f64>>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
