use serde::{Deserialize, Serialize};

use super::defaults;

/// Descriptor codec configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Schema version written into new records.
    pub schema_version: u16,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            schema_version: defaults::DEFAULT_SCHEMA_VERSION,
        }
    }
}
