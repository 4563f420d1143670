use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid temperature '{0}'. Expected a positive number of kelvin (e.g., '296' or '296K').")]
    InvalidTemperature(String),

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidAssignment(String),

    #[error("Component '{component}' cannot be empty in '{input}'.")]
    EmptyComponent {
        component: &'static str,
        input: String,
    },
}

/// Parses a temperature in kelvin, accepting an optional trailing `K`.
pub fn parse_temperature(input: &str) -> Result<f64, ParseError> {
    let trimmed = input.trim();
    let number = trimmed
        .strip_suffix(['K', 'k'])
        .unwrap_or(trimmed)
        .trim_end();
    match number.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ParseError::InvalidTemperature(input.to_string())),
    }
}

/// Splits a `-S key=value` override at the first `=`.
pub fn parse_assignment(input: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidAssignment(input.to_string()))?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "key",
            input: input.to_string(),
        });
    }
    if value.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "value",
            input: input.to_string(),
        });
    }
    Ok((key, value))
}
