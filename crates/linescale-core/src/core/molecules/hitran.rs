use super::resolver::{MoleculeResolver, ResolveError};
use crate::core::models::ids::MoleculeId;
use phf::phf_map;

static HITRAN_NAMES: phf::Map<u16, &'static str> = phf_map! {
    1u16 => "H2O",
    2u16 => "CO2",
    3u16 => "O3",
    4u16 => "N2O",
    5u16 => "CO",
    6u16 => "CH4",
    7u16 => "O2",
    8u16 => "NO",
    9u16 => "SO2",
    10u16 => "NO2",
    11u16 => "NH3",
    12u16 => "HNO3",
    13u16 => "OH",
    14u16 => "HF",
    15u16 => "HCl",
    16u16 => "HBr",
    17u16 => "HI",
    18u16 => "ClO",
    19u16 => "OCS",
    20u16 => "H2CO",
    21u16 => "HOCl",
    22u16 => "N2",
    23u16 => "HCN",
    24u16 => "CH3Cl",
    25u16 => "H2O2",
    26u16 => "C2H2",
    27u16 => "C2H6",
    28u16 => "PH3",
    29u16 => "COF2",
    30u16 => "SF6",
    31u16 => "H2S",
    32u16 => "HCOOH",
    33u16 => "HO2",
    34u16 => "O",
    35u16 => "ClONO2",
    36u16 => "NO+",
    37u16 => "HOBr",
    38u16 => "C2H4",
    39u16 => "CH3OH",
    40u16 => "CH3Br",
    41u16 => "CH3CN",
    42u16 => "CF4",
    43u16 => "C4H2",
    44u16 => "HC3N",
    45u16 => "H2",
    46u16 => "CS",
    47u16 => "SO3",
    48u16 => "C2N2",
    49u16 => "COCl2",
    50u16 => "SO",
    51u16 => "CH3F",
    52u16 => "GeH4",
    53u16 => "CS2",
    54u16 => "CH3I",
    55u16 => "NF3",
};

/// Resolver backed by the HITRAN molecule numbering.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitranMolecules;

impl HitranMolecules {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self, molecule_id: MoleculeId) -> Option<&'static str> {
        HITRAN_NAMES.get(&molecule_id.0).copied()
    }

    /// Reverse lookup; names are matched exactly (`"CO2"`, not `"co2"`).
    pub fn molecule_id(&self, name: &str) -> Option<MoleculeId> {
        HITRAN_NAMES
            .entries()
            .find(|(_, n)| **n == name)
            .map(|(id, _)| MoleculeId(*id))
    }

    /// All known molecules, ordered by id.
    pub fn all(&self) -> Vec<(MoleculeId, &'static str)> {
        let mut molecules: Vec<_> = HITRAN_NAMES
            .entries()
            .map(|(id, name)| (MoleculeId(*id), *name))
            .collect();
        molecules.sort_by_key(|(id, _)| *id);
        molecules
    }
}

impl MoleculeResolver for HitranMolecules {
    fn resolve(&self, molecule_id: MoleculeId) -> Result<String, ResolveError> {
        self.name(molecule_id)
            .map(str::to_string)
            .ok_or(ResolveError::UnknownMolecule(molecule_id))
    }
}
