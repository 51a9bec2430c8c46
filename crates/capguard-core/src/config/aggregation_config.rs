use serde::{Deserialize, Serialize};

use super::defaults;

/// Hierarchical aggregation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Fewest delta members for which a family record is emitted.
    pub min_family_size: usize,
    /// Most members accepted in one family (at most 255).
    pub max_family_size: usize,
    /// Carry non-zero output classes in the delta metadata segment.
    /// When off, such children are encoded standalone.
    pub emit_output_class_metadata: bool,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            min_family_size: defaults::DEFAULT_MIN_FAMILY_SIZE,
            max_family_size: defaults::DEFAULT_MAX_FAMILY_SIZE,
            emit_output_class_metadata: defaults::DEFAULT_EMIT_OUTPUT_CLASS_METADATA,
        }
    }
}
