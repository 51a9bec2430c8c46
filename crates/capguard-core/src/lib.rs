//! # capguard-core
//!
//! Foundation crate for capguard descriptors.
//! Defines the classification model, decoded record types, traits, errors,
//! config, and constants. Every other crate in the workspace depends on this.

pub mod classification;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use classification::{
    CapabilityFlags, Classification, ClassificationInput, ClassifiedCommand, LogClass, RiskLevel,
};
pub use config::CapguardConfig;
pub use errors::{
    AggregationError, CapguardError, CapguardResult, CodecError, CodecResult, ErrorCode,
};
pub use models::{FamilyKind, RecordKind, ToolDescriptor};
