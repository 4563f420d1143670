use linescale::core::partition::summation::{DEFAULT_CHUNK_SIZE, DEFAULT_RTOL};
use linescale::core::physics::constants::{HITRAN_REFERENCE_TEMPERATURE, SECOND_RADIATION_CONSTANT};

pub struct DefaultsConfig {
    pub reference_temperature: f64,
    pub c2: f64,
    pub chunk_size: usize,
    pub rtol: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            reference_temperature: HITRAN_REFERENCE_TEMPERATURE,
            c2: SECOND_RADIATION_CONSTANT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            rtol: DEFAULT_RTOL,
        }
    }
}
