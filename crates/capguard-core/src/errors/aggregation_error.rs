use super::codec_error::CodecError;
use super::error_code::{self, ErrorCode};
use crate::models::OverflowReason;

/// Family-level aggregation and reconstruction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregationError {
    /// A child's delta does not fit a delta record. Recoverable: the child is
    /// encoded as a standalone descriptor instead.
    #[error("encoding overflow for child {child}: {reason}")]
    EncodingOverflow { child: String, reason: OverflowReason },

    /// Some record of a family failed verification. No child is returned.
    #[error("family integrity error: {reason}")]
    FamilyIntegrityError { reason: String },

    #[error("family {family} has no members")]
    EmptyFamily { family: String },

    #[error("family {family} has {members} members, max {max}")]
    FamilyTooLarge {
        family: String,
        members: usize,
        max: usize,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl AggregationError {
    /// Shorthand for [`AggregationError::FamilyIntegrityError`].
    pub fn integrity(reason: impl Into<String>) -> Self {
        Self::FamilyIntegrityError {
            reason: reason.into(),
        }
    }
}

impl ErrorCode for AggregationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EncodingOverflow { .. } => error_code::ENCODING_OVERFLOW,
            Self::FamilyIntegrityError { .. } => error_code::FAMILY_INTEGRITY_ERROR,
            Self::EmptyFamily { .. } => error_code::EMPTY_FAMILY,
            Self::FamilyTooLarge { .. } => error_code::FAMILY_TOO_LARGE,
            Self::Codec(inner) => inner.error_code(),
        }
    }
}
