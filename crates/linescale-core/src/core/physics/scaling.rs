use super::constants::RadiationConstants;
use crate::core::models::line::LineRecord;

#[inline]
pub fn partition_ratio(q_ref: f64, q_gas: f64) -> f64 {
    q_ref / q_gas
}

/// Lower-state population correction `exp(-c2·E_low·(1/T_gas − 1/T_ref))`.
#[inline]
pub fn boltzmann_factor(c2: f64, lower_state_energy: f64, t_ref: f64, t_gas: f64) -> f64 {
    (-c2 * lower_state_energy * (1.0 / t_gas - 1.0 / t_ref)).exp()
}

/// Stimulated-emission correction `(1 − exp(−c2·ν/T_gas)) / (1 − exp(−c2·ν/T_ref))`.
///
/// Both terms go through `exp_m1` so the ratio keeps full precision when
/// `c2·ν/T` is small (far-infrared lines, hot gas). At ν = 0 the expression is
/// 0/0 and the analytic limit `T_ref / T_gas` is returned instead.
#[inline]
pub fn stimulated_emission_factor(c2: f64, wavenumber: f64, t_ref: f64, t_gas: f64) -> f64 {
    let x_ref = c2 * wavenumber / t_ref;
    if x_ref == 0.0 {
        return t_ref / t_gas;
    }
    let x_gas = c2 * wavenumber / t_gas;
    (-x_gas).exp_m1() / (-x_ref).exp_m1()
}

/// Equilibrium linestrength of `line` at `t_gas`, given its tabulated value at `t_ref`
/// and the isotopologue partition functions at both temperatures.
#[inline]
pub fn scaled_linestrength(
    constants: &RadiationConstants,
    line: &LineRecord,
    q_ref: f64,
    q_gas: f64,
    t_ref: f64,
    t_gas: f64,
) -> f64 {
    line.reference_intensity
        * partition_ratio(q_ref, q_gas)
        * boltzmann_factor(constants.c2, line.lower_state_energy, t_ref, t_gas)
        * stimulated_emission_factor(constants.c2, line.wavenumber, t_ref, t_gas)
}
