//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that validation failed.
    #[error("validation failed: {message}")]
    ValidationFailed { message: String },
}

/// A trait for validating configuration parameters.
///
/// Implemented by every serde configuration type in the crate so that values
/// deserialized from user files are checked before use.
pub trait ConfigValidator {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a float value is finite.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `field_name` - The name of the field being validated.
    fn validate_finite(&self, value: f32, field_name: &str) -> Result<(), ConfigError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::InvalidConfig {
                message: format!("{field_name} must be finite, got {value}"),
            })
        }
    }

    /// Validates that an optional duration in milliseconds is positive.
    fn validate_timeout_ms(
        &self,
        timeout_ms: Option<u64>,
        field_name: &str,
    ) -> Result<(), ConfigError> {
        match timeout_ms {
            Some(0) => Err(ConfigError::InvalidConfig {
                message: format!("{field_name} must be greater than 0 when set"),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    impl ConfigValidator for Dummy {
        fn validate(&self) -> Result<(), ConfigError> {
            Ok(())
        }

        fn get_defaults() -> Self {
            Dummy
        }
    }

    #[test]
    fn test_validate_finite() {
        assert!(Dummy.validate_finite(1.5, "scale").is_ok());
        let err = Dummy.validate_finite(f32::NAN, "scale").unwrap_err();
        assert!(err.to_string().contains("scale must be finite"));
    }

    #[test]
    fn test_validate_timeout() {
        assert!(Dummy.validate_timeout_ms(None, "timeout").is_ok());
        assert!(Dummy.validate_timeout_ms(Some(10), "timeout").is_ok());
        assert!(Dummy.validate_timeout_ms(Some(0), "timeout").is_err());
    }
}
