mod aggregation_config;
mod codec_config;
pub mod defaults;
mod observability_config;
mod registry_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use aggregation_config::AggregationConfig;
pub use codec_config::CodecConfig;
pub use observability_config::ObservabilityConfig;
pub use registry_config::RegistryConfig;

use crate::constants::{MAX_FAMILY_MEMBERS, SUPPORTED_SCHEMA_VERSIONS};
use crate::errors::ConfigError;

/// Top-level configuration, one section per subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapguardConfig {
    pub codec: CodecConfig,
    pub aggregation: AggregationConfig,
    pub registry: RegistryConfig,
    pub observability: ObservabilityConfig,
}

impl CapguardConfig {
    /// Parse TOML; missing sections and fields take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml(&content)
    }

    /// Reject values the codec or registry cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_SCHEMA_VERSIONS.contains(&self.codec.schema_version) {
            return Err(invalid(
                "codec.schema_version",
                format!(
                    "{} is not one of {SUPPORTED_SCHEMA_VERSIONS:?}",
                    self.codec.schema_version
                ),
            ));
        }

        let agg = &self.aggregation;
        if agg.min_family_size < 2 {
            return Err(invalid(
                "aggregation.min_family_size",
                format!("{} is below 2", agg.min_family_size),
            ));
        }
        if agg.max_family_size > MAX_FAMILY_MEMBERS {
            return Err(invalid(
                "aggregation.max_family_size",
                format!("{} exceeds {MAX_FAMILY_MEMBERS}", agg.max_family_size),
            ));
        }
        if agg.min_family_size > agg.max_family_size {
            return Err(invalid(
                "aggregation.min_family_size",
                format!(
                    "{} exceeds max_family_size {}",
                    agg.min_family_size, agg.max_family_size
                ),
            ));
        }

        let shards = self.registry.shard_amount;
        if shards < 2 || !shards.is_power_of_two() {
            return Err(invalid(
                "registry.shard_amount",
                format!("{shards} must be a power of two greater than 1"),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message,
    }
}
