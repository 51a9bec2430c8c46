use serde::{Deserialize, Serialize};

use super::defaults;

/// Descriptor registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Entries to reserve space for up front.
    pub initial_capacity: usize,
    /// Number of lock shards. Power of two, greater than one.
    pub shard_amount: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: defaults::DEFAULT_REGISTRY_INITIAL_CAPACITY,
            shard_amount: defaults::DEFAULT_REGISTRY_SHARD_AMOUNT,
        }
    }
}
