use crate::core::physics::constants::RadiationConstants;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {value} (must be positive and finite)")]
    InvalidParameter { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalingConfig {
    /// Temperature the line list intensities are tabulated at, in K.
    pub reference_temperature: f64,
    /// Target gas temperature, in K.
    pub gas_temperature: f64,
    pub constants: RadiationConstants,
}

#[derive(Default)]
pub struct ScalingConfigBuilder {
    reference_temperature: Option<f64>,
    gas_temperature: Option<f64>,
    constants: Option<RadiationConstants>,
}

impl ScalingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference_temperature(mut self, temperature: f64) -> Self {
        self.reference_temperature = Some(temperature);
        self
    }
    pub fn gas_temperature(mut self, temperature: f64) -> Self {
        self.gas_temperature = Some(temperature);
        self
    }
    pub fn constants(mut self, constants: RadiationConstants) -> Self {
        self.constants = Some(constants);
        self
    }
    pub fn c2(mut self, c2: f64) -> Self {
        self.constants = Some(RadiationConstants::new(c2));
        self
    }

    /// Temperature values are range-checked when scaling starts, not here.
    pub fn build(self) -> Result<ScalingConfig, ConfigError> {
        let constants = self.constants.unwrap_or_default();
        if !(constants.c2.is_finite() && constants.c2 > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "c2",
                value: constants.c2,
            });
        }
        Ok(ScalingConfig {
            reference_temperature: self
                .reference_temperature
                .ok_or(ConfigError::MissingParameter("reference_temperature"))?,
            gas_temperature: self
                .gas_temperature
                .ok_or(ConfigError::MissingParameter("gas_temperature"))?,
            constants,
        })
    }
}
