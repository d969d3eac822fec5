//! Error types for simulation setup and I/O.
//!
//! Nothing that happens inside a step is an error: failed actions, deaths
//! and empty populations are ordinary outcomes. Errors are reserved for
//! invalid configuration, placement that cannot be satisfied at
//! construction, and the I/O done by exporters.

use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors that can occur while building or driving a simulation.
#[derive(Debug, Clone, Error)]
pub enum SimError {
    /// A configuration value cannot be used.
    #[error("invalid value for {field}: {value} ({reason})")]
    Config {
        field: String,
        value: String,
        reason: String,
    },
    /// Agents could not be placed on the grid.
    #[error("placement failed: {0}")]
    Placement(String),
    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(String),
    /// Serialization errors.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Serialization(e.to_string())
    }
}

// Convenience constructors
impl SimError {
    pub fn invalid_config(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        SimError::Config {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn placement(msg: impl Into<String>) -> Self {
        SimError::Placement(msg.into())
    }
}

/// Fail with a config error unless `value` is finite and `>= 0`.
pub fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid_config(field, value, "must be finite and >= 0"))
    }
}

/// Fail with a config error unless `value` lies in `[0, 1]`.
pub fn ensure_probability(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::invalid_config(field, value, "must be within 0.0-1.0"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_field() {
        let err = SimError::invalid_config("width", 0, "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid value for width: 0 (must be positive)"
        );
    }

    #[test]
    fn range_helpers() {
        assert!(ensure_non_negative("rate", 0.0).is_ok());
        assert!(ensure_non_negative("rate", -0.1).is_err());
        assert!(ensure_non_negative("rate", f64::NAN).is_err());
        assert!(ensure_probability("p", 1.0).is_ok());
        assert!(ensure_probability("p", 1.5).is_err());
    }
}
