//! Adjudication configuration.
//!
//! Loaded from TOML at startup and passed to the claims engine. Both
//! settings have defaults, so an empty document is a valid configuration.
//!
//! Example:
//! ```toml
//! require_manufacturing_record = true
//! enforce_coverage_cap = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use clearsight_contracts::error::{ClearsightError, ClearsightResult};

fn default_enforce_coverage_cap() -> bool {
    true
}

/// Settings that shape claim adjudication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjudicationConfig {
    /// When true, approving a claim requires a dispensed-glasses record for
    /// the claim's prescription; without one the approval fails with
    /// `NoManufacturingRecord`. Off by default — the cross-check is optional.
    #[serde(default)]
    pub require_manufacturing_record: bool,

    /// When true (the default), the approved amount must not exceed the
    /// policy's per-claim coverage limit.
    #[serde(default = "default_enforce_coverage_cap")]
    pub enforce_coverage_cap: bool,
}

impl Default for AdjudicationConfig {
    fn default() -> Self {
        Self {
            require_manufacturing_record: false,
            enforce_coverage_cap: true,
        }
    }
}

impl AdjudicationConfig {
    /// Parse `s` as TOML and build an `AdjudicationConfig`.
    ///
    /// Returns `ClearsightError::ConfigError` if the TOML is malformed or
    /// does not match the expected schema.
    pub fn from_toml_str(s: &str) -> ClearsightResult<Self> {
        toml::from_str(s).map_err(|e| ClearsightError::ConfigError {
            reason: format!("failed to parse adjudication TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as TOML configuration.
    ///
    /// Returns `ClearsightError::ConfigError` if the file cannot be read or
    /// its contents are not valid TOML matching the schema.
    pub fn from_file(path: &Path) -> ClearsightResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ClearsightError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AdjudicationConfig::from_toml_str("").unwrap();
        assert!(!config.require_manufacturing_record);
        assert!(config.enforce_coverage_cap);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = AdjudicationConfig::from_toml_str(
            "require_manufacturing_record = true\nenforce_coverage_cap = false\n",
        )
        .unwrap();
        assert!(config.require_manufacturing_record);
        assert!(!config.enforce_coverage_cap);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = AdjudicationConfig::from_toml_str("require_manufacturing_record = \"yes\"")
            .unwrap_err();
        assert!(matches!(err, ClearsightError::ConfigError { .. }));
    }
}
