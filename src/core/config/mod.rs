//! Configuration management for the input pipeline.
//!
//! This module provides configuration types and the validation trait shared
//! by every configurable component.

pub mod canonicalize;
pub mod errors;

pub use canonicalize::CanonicalizeConfig;
pub use errors::{ConfigError, ConfigValidator};
