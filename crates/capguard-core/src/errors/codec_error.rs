use super::error_code::{self, ErrorCode};

/// Record-level encode/decode errors.
///
/// A decode that returns any of these exposes no field of the record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("unsupported schema version {version}")]
    UnsupportedVersion { version: u16 },

    #[error("checksum mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    ChecksumMismatch { stored: u16, computed: u16 },

    #[error("invalid risk ordinal {ordinal}: must be 0-4")]
    InvalidRiskOrdinal { ordinal: u8 },

    #[error("invalid capability flags {bits:#010x}: bits 0-2 are reserved for the risk ordinal")]
    InvalidCapabilityFlags { bits: u32 },

    #[error("invalid {field} class {value}: must be 0-15")]
    InvalidPerformanceClass { field: &'static str, value: u16 },
}

impl CodecError {
    /// Shorthand for [`CodecError::MalformedInput`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }
}

impl ErrorCode for CodecError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => error_code::MALFORMED_INPUT,
            Self::UnsupportedVersion { .. } => error_code::UNSUPPORTED_VERSION,
            Self::ChecksumMismatch { .. } => error_code::CHECKSUM_MISMATCH,
            Self::InvalidRiskOrdinal { .. } => error_code::INVALID_RISK_ORDINAL,
            Self::InvalidCapabilityFlags { .. } => error_code::INVALID_CAPABILITY_FLAGS,
            Self::InvalidPerformanceClass { .. } => error_code::INVALID_PERFORMANCE_CLASS,
        }
    }
}
