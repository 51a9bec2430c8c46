//! Validity contract for classifier output: legal ranges and bit positions.
//! It makes no judgment about which flags a command should carry.

pub mod capability;
pub mod input;
pub mod log_class;
pub mod risk;

pub use capability::CapabilityFlags;
pub use input::{Classification, ClassificationInput, ClassifiedCommand};
pub use log_class::LogClass;
pub use risk::RiskLevel;
