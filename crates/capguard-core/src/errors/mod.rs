mod aggregation_error;
mod classifier_error;
mod codec_error;
mod config_error;
pub mod error_code;

pub use aggregation_error::AggregationError;
pub use classifier_error::ClassifierError;
pub use codec_error::CodecError;
pub use config_error::ConfigError;
pub use error_code::ErrorCode;

/// Top-level error for the capguard workspace.
#[derive(Debug, thiserror::Error)]
pub enum CapguardError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ErrorCode for CapguardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Codec(e) => e.error_code(),
            Self::Aggregation(e) => e.error_code(),
            Self::Classifier(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

/// Result alias for record-level codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Result alias used across the workspace.
pub type CapguardResult<T> = Result<T, CapguardError>;
