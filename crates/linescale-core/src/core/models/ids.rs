use std::fmt;

/// Numeric identifier of a molecular species, shared by all of its isotopologues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoleculeId(pub u16);

/// Isotopologue number, unique only within its molecule.
///
/// Numbering may be sparse (HITRAN starts at 1 and skips retired entries),
/// so the value doubles as a direct index into per-isotopologue tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IsotopologueId(pub u16);

impl IsotopologueId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u16> for MoleculeId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<u16> for IsotopologueId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for MoleculeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for IsotopologueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
