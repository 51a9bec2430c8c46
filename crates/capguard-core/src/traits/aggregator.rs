use crate::errors::AggregationError;
use crate::models::{AggregationOutcome, FamilyInput, ToolDescriptor};

/// Two-level family/delta compression.
pub trait IAggregator: Send + Sync {
    /// Aggregate siblings into one parent record plus per-child deltas.
    fn aggregate_family(&self, input: &FamilyInput)
        -> Result<AggregationOutcome, AggregationError>;

    /// Reconstruct every child of a family, or none of them.
    fn decode_family(
        &self,
        family_bytes: &[u8],
        delta_bytes: &[&[u8]],
    ) -> Result<Vec<ToolDescriptor>, AggregationError>;
}
