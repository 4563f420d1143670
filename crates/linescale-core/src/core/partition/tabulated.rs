use super::provider::{PartitionError, PartitionFunctionProvider};
use crate::core::models::ids::IsotopologueId;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct TableRow {
    molecule: String,
    isotopologue: u16,
    temperature: f64,
    q: f64,
}

/// Q(T) samples for one isotopologue, sorted by strictly increasing temperature.
#[derive(Debug, Clone, PartialEq)]
struct Series {
    temperatures: Vec<f64>,
    values: Vec<f64>,
}

impl Series {
    fn from_points(mut points: Vec<(f64, f64)>) -> Result<Self, String> {
        if points.is_empty() {
            return Err("series has no points".to_string());
        }
        for &(t, q) in &points {
            if !(t.is_finite() && t > 0.0) {
                return Err(format!("invalid temperature {t}"));
            }
            if !(q.is_finite() && q > 0.0) {
                return Err(format!("invalid partition function value {q} at {t} K"));
            }
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(w) = points.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(format!("duplicate temperature {}", w[0].0));
        }
        let (temperatures, values) = points.into_iter().unzip();
        Ok(Self {
            temperatures,
            values,
        })
    }

    fn min(&self) -> f64 {
        self.temperatures[0]
    }

    fn max(&self) -> f64 {
        self.temperatures[self.temperatures.len() - 1]
    }

    /// Linear interpolation; both grid ends are inclusive.
    fn interpolate(&self, temperature: f64) -> Result<f64, PartitionError> {
        let (min, max) = (self.min(), self.max());
        if !(temperature >= min && temperature <= max) {
            return Err(PartitionError::TemperatureOutOfRange {
                temperature,
                min,
                max,
            });
        }

        let idx = self.temperatures.partition_point(|&t| t < temperature);
        if self.temperatures[idx] == temperature {
            return Ok(self.values[idx]);
        }

        let (t0, t1) = (self.temperatures[idx - 1], self.temperatures[idx]);
        let (q0, q1) = (self.values[idx - 1], self.values[idx]);
        Ok(q0 + (q1 - q0) * (temperature - t0) / (t1 - t0))
    }
}

#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid partition function series for {molecule} isotopologue {isotopologue}: {reason}")]
    InvalidSeries {
        molecule: String,
        isotopologue: IsotopologueId,
        reason: String,
    },
}

/// Partition functions interpolated from per-isotopologue Q(T) tables (TIPS-style).
#[derive(Debug, Clone, Default)]
pub struct TabulatedPartitionFunction {
    series: HashMap<String, HashMap<IsotopologueId, Series>>,
}

impl TabulatedPartitionFunction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a table with the columns `molecule,isotopologue,temperature,q`.
    pub fn load(path: &Path) -> Result<Self, TableLoadError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| TableLoadError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let mut grouped: HashMap<(String, IsotopologueId), Vec<(f64, f64)>> = HashMap::new();
        for result in reader.deserialize::<TableRow>() {
            let row = result.map_err(|e| TableLoadError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            grouped
                .entry((row.molecule, IsotopologueId(row.isotopologue)))
                .or_default()
                .push((row.temperature, row.q));
        }

        let mut table = Self::new();
        for ((molecule, isotopologue), points) in grouped {
            table.insert(&molecule, isotopologue, points)?;
        }
        debug!(
            series = table.len(),
            "Loaded partition function table from {:?}", path
        );
        Ok(table)
    }

    /// Adds or replaces the Q(T) series of one isotopologue. Points need not be sorted.
    pub fn insert(
        &mut self,
        molecule: &str,
        isotopologue: IsotopologueId,
        points: Vec<(f64, f64)>,
    ) -> Result<(), TableLoadError> {
        let series =
            Series::from_points(points).map_err(|reason| TableLoadError::InvalidSeries {
                molecule: molecule.to_string(),
                isotopologue,
                reason,
            })?;
        self.series
            .entry(molecule.to_string())
            .or_default()
            .insert(isotopologue, series);
        Ok(())
    }

    /// Temperature range covered for an isotopologue, if it is tabulated.
    pub fn range(&self, molecule: &str, isotopologue: IsotopologueId) -> Option<(f64, f64)> {
        self.series
            .get(molecule)
            .and_then(|by_iso| by_iso.get(&isotopologue))
            .map(|s| (s.min(), s.max()))
    }

    pub fn len(&self) -> usize {
        self.series.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartitionFunctionProvider for TabulatedPartitionFunction {
    fn at(
        &self,
        molecule: &str,
        isotopologue: IsotopologueId,
        temperature: f64,
    ) -> Result<f64, PartitionError> {
        let series = self
            .series
            .get(molecule)
            .and_then(|by_iso| by_iso.get(&isotopologue))
            .ok_or_else(|| PartitionError::UnsupportedIsotopologue {
                molecule: molecule.to_string(),
                isotopologue,
            })?;
        series.interpolate(temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const TOLERANCE: f64 = 1e-12;

    fn co2_table() -> TabulatedPartitionFunction {
        let mut table = TabulatedPartitionFunction::new();
        table
            .insert(
                "CO2",
                IsotopologueId(1),
                vec![(300.0, 290.0), (200.0, 190.0), (400.0, 410.0)],
            )
            .unwrap();
        table
    }

    #[test]
    fn exact_grid_points_return_tabulated_values() {
        let table = co2_table();
        assert_eq!(table.at("CO2", IsotopologueId(1), 200.0).unwrap(), 190.0);
        assert_eq!(table.at("CO2", IsotopologueId(1), 300.0).unwrap(), 290.0);
    }

    #[test]
    fn interior_points_are_linearly_interpolated() {
        let table = co2_table();
        let q = table.at("CO2", IsotopologueId(1), 350.0).unwrap();
        assert!((q - 350.0).abs() < TOLERANCE);
        let q = table.at("CO2", IsotopologueId(1), 250.0).unwrap();
        assert!((q - 240.0).abs() < TOLERANCE);
    }

    #[test]
    fn range_boundaries_are_inclusive() {
        let table = co2_table();
        assert_eq!(table.range("CO2", IsotopologueId(1)), Some((200.0, 400.0)));
        assert_eq!(table.at("CO2", IsotopologueId(1), 400.0).unwrap(), 410.0);
        assert_eq!(table.at("CO2", IsotopologueId(1), 200.0).unwrap(), 190.0);
    }

    #[test]
    fn temperatures_outside_the_grid_are_rejected() {
        let table = co2_table();
        let err = table.at("CO2", IsotopologueId(1), 400.0001).unwrap_err();
        assert!(matches!(
            err,
            PartitionError::TemperatureOutOfRange { min, max, .. } if min == 200.0 && max == 400.0
        ));
        assert!(table.at("CO2", IsotopologueId(1), 199.0).is_err());
        assert!(table.at("CO2", IsotopologueId(1), f64::NAN).is_err());
    }

    #[test]
    fn unknown_isotopologue_or_molecule_is_unsupported() {
        let table = co2_table();
        assert!(matches!(
            table.at("CO2", IsotopologueId(2), 300.0),
            Err(PartitionError::UnsupportedIsotopologue { .. })
        ));
        assert!(matches!(
            table.at("CH4", IsotopologueId(1), 300.0),
            Err(PartitionError::UnsupportedIsotopologue { .. })
        ));
    }

    #[test]
    fn single_point_series_answers_only_its_own_temperature() {
        let mut table = TabulatedPartitionFunction::new();
        table.insert("CO", IsotopologueId(1), vec![(296.0, 107.1)]).unwrap();
        assert_eq!(table.at("CO", IsotopologueId(1), 296.0).unwrap(), 107.1);
        assert!(table.at("CO", IsotopologueId(1), 300.0).is_err());
    }

    #[test]
    fn insert_rejects_invalid_series() {
        let mut table = TabulatedPartitionFunction::new();
        assert!(matches!(
            table.insert("CO", IsotopologueId(1), vec![]),
            Err(TableLoadError::InvalidSeries { .. })
        ));
        assert!(
            table
                .insert("CO", IsotopologueId(1), vec![(296.0, 1.0), (296.0, 2.0)])
                .is_err()
        );
        assert!(
            table
                .insert("CO", IsotopologueId(1), vec![(296.0, 0.0)])
                .is_err()
        );
        assert!(
            table
                .insert("CO", IsotopologueId(1), vec![(-5.0, 1.0)])
                .is_err()
        );
        assert!(table.is_empty());
    }

    #[test]
    fn load_reads_csv_tables() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("q.csv");
        fs::write(
            &path,
            "molecule,isotopologue,temperature,q\n\
             CH4,1,296,590.5\n\
             CH4,1,300,601.0\n\
             CH4,2,296,1180.0\n\
             CH4,2,300,1202.0\n",
        )
        .unwrap();

        let table = TabulatedPartitionFunction::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.at("CH4", IsotopologueId(2), 300.0).unwrap(), 1202.0);
        let q = table.at("CH4", IsotopologueId(1), 298.0).unwrap();
        assert!((q - 595.75).abs() < 1e-9);
    }

    #[test]
    fn load_fails_for_missing_or_malformed_files() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        assert!(matches!(
            TabulatedPartitionFunction::load(&missing),
            Err(TableLoadError::Csv { .. })
        ));

        let malformed = dir.path().join("malformed.csv");
        fs::write(&malformed, "molecule,isotopologue,temperature,q\nCH4,one,296,1.0\n").unwrap();
        assert!(matches!(
            TabulatedPartitionFunction::load(&malformed),
            Err(TableLoadError::Csv { .. })
        ));
    }
}
