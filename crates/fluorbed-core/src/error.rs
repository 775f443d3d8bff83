//! Errors for configuration bundles and control inputs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failures reading or writing a RON configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] ron::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    // NaN fails this check as well
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositive { field, value })
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Negative { field, value })
    }
}

pub(crate) fn ensure_in_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("flow_rate", 1.0).is_ok());
        assert!(ensure_positive("flow_rate", 0.0).is_err());
        assert!(ensure_positive("flow_rate", f64::NAN).is_err());
    }

    #[test]
    fn test_ensure_in_range_is_inclusive() {
        assert!(ensure_in_range("purity_mix", 0.0, 0.0, 100.0).is_ok());
        assert!(ensure_in_range("purity_mix", 100.0, 0.0, 100.0).is_ok());
        assert!(ensure_in_range("purity_mix", 100.5, 0.0, 100.0).is_err());
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = ensure_non_negative("fluoride_concentration", -2.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "fluoride_concentration must not be negative (got -2)"
        );
    }
}
