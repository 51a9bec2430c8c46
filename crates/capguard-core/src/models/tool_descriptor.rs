use serde::{Deserialize, Serialize};

use crate::classification::{CapabilityFlags, Classification, LogClass, RiskLevel};

/// Which record a descriptor was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A standalone 24-byte record.
    Single,
    /// Reconstructed from a family parent plus one delta record.
    FamilyDelta,
}

/// Decoded, immutable form of one command's descriptor.
///
/// Only ever built from records that passed checksum and range checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub kind: RecordKind,
    pub schema_version: u16,
    /// 32-bit name hash for singles; the 8-bit subcommand hash,
    /// zero-extended, for family children.
    pub name_hash: u32,
    pub risk: RiskLevel,
    pub capabilities: CapabilityFlags,
    pub exec_time_class: LogClass,
    pub memory_class: LogClass,
    pub output_size_class: LogClass,
    /// Length of the command name. Diagnostic only; zero for family children.
    pub name_len: u16,
}

impl ToolDescriptor {
    /// The classification this descriptor carries.
    pub fn classification(&self) -> Classification {
        Classification {
            risk: self.risk,
            capabilities: self.capabilities,
            exec_time_class: self.exec_time_class,
            memory_class: self.memory_class,
            output_size_class: self.output_size_class,
        }
    }

    pub fn has(&self, flag: CapabilityFlags) -> bool {
        self.capabilities.contains(flag)
    }
}

/// Risk a consumer should act on for a decode result.
///
/// Any error means the bytes cannot be trusted, so the answer is
/// [`RiskLevel::FAIL_CLOSED`]. Deciding to call this is the consumer's job;
/// the codec never substitutes a value by itself.
pub fn effective_risk<E>(decoded: &Result<ToolDescriptor, E>) -> RiskLevel {
    match decoded {
        Ok(descriptor) => descriptor.risk,
        Err(_) => RiskLevel::FAIL_CLOSED,
    }
}
