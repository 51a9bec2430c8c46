use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::AggregationError;

/// Why a child could not be expressed as a delta record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum OverflowReason {
    /// `risk - risk_floor` does not fit in 3 bits.
    RiskDelta { risk_delta: u8 },
    /// Child-specific flags outside the delta's core window (word bits 3-15).
    DeltaFlags { bits: u32 },
    /// Another member already uses this 8-bit subcommand hash.
    SubcommandHashCollision { hash: u8 },
    /// Non-zero output class while metadata emission is disabled.
    OutputClass { class: u8 },
}

impl fmt::Display for OverflowReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RiskDelta { risk_delta } => {
                write!(f, "risk delta {risk_delta} exceeds 3 bits")
            }
            Self::DeltaFlags { bits } => {
                write!(f, "delta flags {bits:#010x} fall outside the core window")
            }
            Self::SubcommandHashCollision { hash } => {
                write!(f, "subcommand hash {hash:#04x} already used in family")
            }
            Self::OutputClass { class } => {
                write!(f, "output class {class} needs metadata, which is disabled")
            }
        }
    }
}

/// A family member that was encoded standalone instead of as a delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverflowedChild {
    pub name: String,
    pub reason: OverflowReason,
}

impl OverflowedChild {
    /// The taxonomy value for this overflow.
    pub fn to_error(&self) -> AggregationError {
        AggregationError::EncodingOverflow {
            child: self.name.clone(),
            reason: self.reason,
        }
    }
}

/// Size accounting for one aggregation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionReport {
    /// Every child encoded as a standalone record: N × 24.
    pub original_total_bytes: usize,
    /// Parent + deltas + overflowed standalone records.
    pub compressed_total_bytes: usize,
    /// `original / compressed`; above 1.0 means bytes were saved.
    pub ratio: f64,
    pub overflowed_children: Vec<OverflowedChild>,
}

impl CompressionReport {
    pub fn new(
        original_total_bytes: usize,
        compressed_total_bytes: usize,
        overflowed_children: Vec<OverflowedChild>,
    ) -> Self {
        let ratio = if compressed_total_bytes == 0 {
            0.0
        } else {
            original_total_bytes as f64 / compressed_total_bytes as f64
        };
        Self {
            original_total_bytes,
            compressed_total_bytes,
            ratio,
            overflowed_children,
        }
    }

    pub fn bytes_saved(&self) -> usize {
        self.original_total_bytes
            .saturating_sub(self.compressed_total_bytes)
    }
}
