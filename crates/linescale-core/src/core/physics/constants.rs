/// Second radiation constant c2 = hc/k_B in cm·K (CODATA 2018, exact).
pub const SECOND_RADIATION_CONSTANT: f64 = 1.438_776_877;

/// Reference temperature of the HITRAN/HITEMP line lists, in K.
pub const HITRAN_REFERENCE_TEMPERATURE: f64 = 296.0;

/// Physical constants the scaling law depends on.
///
/// Passed explicitly rather than read from a global so callers can work in an
/// alternate unit system or pin an older constant set when reproducing
/// published numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiationConstants {
    /// hc/k_B, in K per wavenumber unit (K·cm for cm-1 line lists).
    pub c2: f64,
}

impl RadiationConstants {
    pub fn new(c2: f64) -> Self {
        Self { c2 }
    }
}

impl Default for RadiationConstants {
    fn default() -> Self {
        Self {
            c2: SECOND_RADIATION_CONSTANT,
        }
    }
}
