mod compression_report;
mod delta_descriptor;
mod family_descriptor;
mod family_encoding;
mod tool_descriptor;

pub use compression_report::{CompressionReport, OverflowReason, OverflowedChild};
pub use delta_descriptor::{DeltaDescriptor, EncodedDelta};
pub use family_descriptor::{FamilyDescriptor, FamilyKind};
pub use family_encoding::{AggregationOutcome, FamilyEncoding, FamilyInput, StandaloneDescriptor};
pub use tool_descriptor::{effective_risk, RecordKind, ToolDescriptor};
