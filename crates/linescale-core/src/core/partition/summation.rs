use super::provider::{PartitionError, PartitionFunctionProvider};
use crate::core::models::ids::IsotopologueId;
use crate::core::physics::constants::RadiationConstants;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace};

pub const DEFAULT_CHUNK_SIZE: usize = 100_000;
pub const DEFAULT_RTOL: f64 = 3e-5;

#[derive(Debug, Deserialize)]
struct LevelRow {
    molecule: String,
    isotopologue: u16,
    degeneracy: f64,
    energy: f64,
}

/// Controls the chunked, early-terminating summation over energy levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummationSettings {
    /// Number of levels added per step before convergence is re-checked.
    pub chunk_size: usize,
    /// Relative change between steps below which the sum is considered converged.
    pub rtol: f64,
}

impl Default for SummationSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            rtol: DEFAULT_RTOL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct EnergyLevels {
    degeneracies: Vec<f64>,
    energies: Vec<f64>, // cm-1, ascending
}

#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid energy levels for {molecule} isotopologue {isotopologue}: {reason}")]
    InvalidLevels {
        molecule: String,
        isotopologue: IsotopologueId,
        reason: String,
    },
}

/// Equilibrium partition function `Q(T) = Σ g·exp(−c2·E/T)` summed from energy-level lists.
#[derive(Debug, Clone)]
pub struct LevelSumPartitionFunction {
    constants: RadiationConstants,
    settings: SummationSettings,
    levels: HashMap<String, HashMap<IsotopologueId, EnergyLevels>>,
}

impl LevelSumPartitionFunction {
    pub fn new(constants: RadiationConstants, settings: SummationSettings) -> Self {
        Self {
            constants,
            settings,
            levels: HashMap::new(),
        }
    }

    /// Loads levels from a CSV file with the columns `molecule,isotopologue,degeneracy,energy`.
    pub fn load(
        path: &Path,
        constants: RadiationConstants,
        settings: SummationSettings,
    ) -> Result<Self, LevelLoadError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| LevelLoadError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let mut grouped: HashMap<(String, IsotopologueId), Vec<(f64, f64)>> = HashMap::new();
        for result in reader.deserialize::<LevelRow>() {
            let row = result.map_err(|e| LevelLoadError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            grouped
                .entry((row.molecule, IsotopologueId(row.isotopologue)))
                .or_default()
                .push((row.degeneracy, row.energy));
        }

        let mut provider = Self::new(constants, settings);
        for ((molecule, isotopologue), levels) in grouped {
            provider.insert(&molecule, isotopologue, levels)?;
        }
        debug!(
            series = provider.len(),
            "Loaded energy levels from {:?}", path
        );
        Ok(provider)
    }

    /// Adds or replaces the `(degeneracy, energy)` levels of one isotopologue.
    pub fn insert(
        &mut self,
        molecule: &str,
        isotopologue: IsotopologueId,
        mut levels: Vec<(f64, f64)>,
    ) -> Result<(), LevelLoadError> {
        let invalid = |reason: String| LevelLoadError::InvalidLevels {
            molecule: molecule.to_string(),
            isotopologue,
            reason,
        };
        if levels.is_empty() {
            return Err(invalid("no levels".to_string()));
        }
        if let Some((g, e)) = levels
            .iter()
            .find(|(g, e)| !(g.is_finite() && *g > 0.0 && e.is_finite()))
        {
            return Err(invalid(format!("level with degeneracy {g} and energy {e}")));
        }

        // Lowest levels dominate the sum; ordering them first lets it terminate early.
        levels.sort_by(|a, b| a.1.total_cmp(&b.1));
        let (degeneracies, energies) = levels.into_iter().unzip();
        self.levels
            .entry(molecule.to_string())
            .or_default()
            .insert(
                isotopologue,
                EnergyLevels {
                    degeneracies,
                    energies,
                },
            );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.levels.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn settings(&self) -> SummationSettings {
        self.settings
    }

    fn sum(&self, levels: &EnergyLevels, temperature: f64) -> f64 {
        let c2_over_t = self.constants.c2 / temperature;
        let chunk_size = self.settings.chunk_size.max(1);
        let chunk_sum = |g: &[f64], e: &[f64]| -> f64 {
            g.iter()
                .zip(e)
                .map(|(g, e)| g * (-c2_over_t * e).exp())
                .sum()
        };

        let mut chunks = levels
            .degeneracies
            .chunks(chunk_size)
            .zip(levels.energies.chunks(chunk_size));
        let Some((g, e)) = chunks.next() else {
            return 0.0;
        };
        let mut total = chunk_sum(g, e);
        let mut summed = g.len();

        for (g, e) in chunks {
            let last = total;
            total += chunk_sum(g, e);
            summed += g.len();
            if ((total - last) / total).abs() <= self.settings.rtol {
                break;
            }
        }
        trace!(
            summed,
            available = levels.energies.len(),
            temperature,
            "Partition sum converged."
        );
        total
    }
}

impl PartitionFunctionProvider for LevelSumPartitionFunction {
    fn at(
        &self,
        molecule: &str,
        isotopologue: IsotopologueId,
        temperature: f64,
    ) -> Result<f64, PartitionError> {
        let levels = self
            .levels
            .get(molecule)
            .and_then(|by_iso| by_iso.get(&isotopologue))
            .ok_or_else(|| PartitionError::UnsupportedIsotopologue {
                molecule: molecule.to_string(),
                isotopologue,
            })?;

        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(PartitionError::TemperatureOutOfRange {
                temperature,
                min: 0.0,
                max: f64::INFINITY,
            });
        }

        let q = self.sum(levels, temperature);
        if q > 0.0 {
            Ok(q)
        } else {
            Err(PartitionError::NonPositive {
                value: q,
                temperature,
            })
        }
    }
}
