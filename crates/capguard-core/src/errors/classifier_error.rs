use super::error_code::{self, ErrorCode};

/// Errors raised by classifier implementations.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("no classification for command: {name}")]
    UnknownCommand { name: String },

    #[error("classification table {source_name}: {reason}")]
    TableLoad { source_name: String, reason: String },

    #[error("invalid classifier rule {pattern}: {reason}")]
    InvalidRule { pattern: String, reason: String },
}

impl ErrorCode for ClassifierError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCommand { .. } => error_code::UNKNOWN_COMMAND,
            Self::TableLoad { .. } => error_code::CLASSIFIER_TABLE_ERROR,
            Self::InvalidRule { .. } => error_code::CLASSIFIER_RULE_ERROR,
        }
    }
}
