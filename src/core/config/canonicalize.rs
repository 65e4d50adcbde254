//! Configuration for input canonicalization.

use super::errors::{ConfigError, ConfigValidator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for [`InputCanonicalizer`](crate::pipeline::InputCanonicalizer).
///
/// # Examples
///
/// ```
/// use netinput::core::config::CanonicalizeConfig;
///
/// let config: CanonicalizeConfig =
///     serde_json::from_str(r#"{ "readiness_timeout_ms": 5000 }"#).unwrap();
/// assert_eq!(config.readiness_timeout().map(|d| d.as_millis()), Some(5000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalizeConfig {
    /// Maximum time to wait for a single media element to become ready.
    /// Default: None (wait until the element loads or fails)
    #[serde(default)]
    pub readiness_timeout_ms: Option<u64>,
}

impl CanonicalizeConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the readiness timeout.
    pub fn with_readiness_timeout(mut self, timeout: Duration) -> Self {
        self.readiness_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Returns the readiness timeout as a [`Duration`].
    pub fn readiness_timeout(&self) -> Option<Duration> {
        self.readiness_timeout_ms.map(Duration::from_millis)
    }
}

impl ConfigValidator for CanonicalizeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_timeout_ms(self.readiness_timeout_ms, "readiness_timeout_ms")
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
