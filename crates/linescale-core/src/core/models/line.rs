use super::ids::{IsotopologueId, MoleculeId};

/// A single spectral transition as tabulated at the database reference temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineRecord {
    pub molecule_id: MoleculeId,
    pub isotopologue_id: IsotopologueId,
    pub reference_intensity: f64, // S_ref, cm-1/(molecule.cm-2)
    pub lower_state_energy: f64,  // E_low, cm-1
    pub wavenumber: f64,          // nu, cm-1
}

impl LineRecord {
    pub fn new(
        molecule_id: impl Into<MoleculeId>,
        isotopologue_id: impl Into<IsotopologueId>,
        reference_intensity: f64,
        lower_state_energy: f64,
        wavenumber: f64,
    ) -> Self {
        Self {
            molecule_id: molecule_id.into(),
            isotopologue_id: isotopologue_id.into(),
            reference_intensity,
            lower_state_energy,
            wavenumber,
        }
    }
}

/// A line extended with the partition functions used and its scaled linestrength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledLine {
    pub record: LineRecord,
    pub q_ref: f64,
    pub q_gas: f64,
    pub linestrength: f64, // S at the gas temperature
}

impl ScaledLine {
    #[inline]
    pub fn molecule_id(&self) -> MoleculeId {
        self.record.molecule_id
    }

    #[inline]
    pub fn isotopologue_id(&self) -> IsotopologueId {
        self.record.isotopologue_id
    }
}
