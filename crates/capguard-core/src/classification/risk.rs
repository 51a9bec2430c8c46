use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{CodecError, CodecResult};

/// Risk ordinal, strictly ordered from harmless to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RiskLevel {
    /// Read-only, no side effects (`cat`, `ls`).
    #[default]
    Benign = 0,
    Low = 1,
    Moderate = 2,
    High = 3,
    /// Irreversible or system-wide damage possible (`rm -rf`, `mkfs`).
    Severe = 4,
}

impl RiskLevel {
    /// The level a consumer must assume when a descriptor cannot be trusted.
    pub const FAIL_CLOSED: RiskLevel = RiskLevel::Severe;

    /// Every level in ascending order.
    pub const ALL: [RiskLevel; 5] = [
        Self::Benign,
        Self::Low,
        Self::Moderate,
        Self::High,
        Self::Severe,
    ];

    /// Parse a raw ordinal. Anything above 4 is rejected, never clamped.
    pub fn from_ordinal(ordinal: u8) -> CodecResult<Self> {
        match ordinal {
            0 => Ok(Self::Benign),
            1 => Ok(Self::Low),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::High),
            4 => Ok(Self::Severe),
            _ => Err(CodecError::InvalidRiskOrdinal { ordinal }),
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Benign => "benign",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Severe => "severe",
        };
        f.write_str(label)
    }
}

impl TryFrom<u8> for RiskLevel {
    type Error = CodecError;

    fn try_from(ordinal: u8) -> CodecResult<Self> {
        Self::from_ordinal(ordinal)
    }
}

impl From<RiskLevel> for u8 {
    fn from(level: RiskLevel) -> Self {
        level.ordinal()
    }
}
