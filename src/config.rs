//! Configuration for the filters and the chain that runs them.
//!
//! Nothing here reads files; hosts deserialize these from whatever
//! configuration source they already have.

use serde::Deserialize;

use crate::limiter::{DEFAULT_MAX_NAME_LENGTH, DEFAULT_MAX_VALUE_LENGTH};
use crate::Error;

/// Length limits applied by the limiter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum attribute name length, in bytes.
    pub max_name_length: usize,
    /// Maximum attribute value length, in bytes.
    pub max_value_length: usize,
}

impl LimitConfig {
    /// Checks that both limits are non-zero.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` naming the offending limit.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_name_length == 0 {
            return Err(Error::InvalidConfig(
                "max_name_length must be greater than 0".to_string(),
            ));
        }
        if self.max_value_length == 0 {
            return Err(Error::InvalidConfig(
                "max_value_length must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            max_value_length: DEFAULT_MAX_VALUE_LENGTH,
        }
    }
}

/// Settings for attribute synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Language of the provider display name to consult.
    pub language: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
        }
    }
}

/// Which filters a chain runs, and their settings.
///
/// Enabled filters always run in the order prefix stripping, synthesis,
/// limiting.
///
/// ```
/// use attr_synth::ChainConfig;
///
/// let config = ChainConfig::default();
/// assert!(config.strip_prefixes && config.synthesize && config.limit);
/// assert_eq!(config.limits.max_name_length, 127);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Run the prefix stripper.
    pub strip_prefixes: bool,
    /// Run the synthesizer.
    pub synthesize: bool,
    /// Run the limiter.
    pub limit: bool,
    /// Limiter settings.
    pub limits: LimitConfig,
    /// Synthesizer settings.
    pub synthesis: SynthesisConfig,
}

impl ChainConfig {
    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if any section is out of range.
    pub fn validate(&self) -> Result<(), Error> {
        self.limits.validate()
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            strip_prefixes: true,
            synthesize: true,
            limit: true,
            limits: LimitConfig::default(),
            synthesis: SynthesisConfig::default(),
        }
    }
}
