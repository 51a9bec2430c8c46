use serde::{Deserialize, Serialize};

/// Point-in-time counts for a registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub singles: usize,
    pub families: usize,
    /// Delta members across all published families.
    pub family_children: usize,
    /// Family publications since the registry was created.
    pub publishes: u64,
}

impl RegistryStats {
    /// Descriptors reachable through the registry, counting family children.
    pub fn total_descriptors(&self) -> usize {
        self.singles + self.family_children
    }
}
