//! ErrorCode trait for audit trails.

/// Stable, machine-readable code for every capguard error.
///
/// Consumers log these codes next to their fail-closed decision so the
/// decision can be audited without parsing free-form messages.
pub trait ErrorCode {
    /// Returns the upper-snake error code (e.g., "CHECKSUM_MISMATCH").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted audit string: `[ERROR_CODE] message`.
    fn audit_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const MALFORMED_INPUT: &str = "MALFORMED_INPUT";
pub const UNSUPPORTED_VERSION: &str = "UNSUPPORTED_VERSION";
pub const CHECKSUM_MISMATCH: &str = "CHECKSUM_MISMATCH";
pub const INVALID_RISK_ORDINAL: &str = "INVALID_RISK_ORDINAL";
pub const INVALID_CAPABILITY_FLAGS: &str = "INVALID_CAPABILITY_FLAGS";
pub const INVALID_PERFORMANCE_CLASS: &str = "INVALID_PERFORMANCE_CLASS";
pub const ENCODING_OVERFLOW: &str = "ENCODING_OVERFLOW";
pub const FAMILY_INTEGRITY_ERROR: &str = "FAMILY_INTEGRITY_ERROR";
pub const EMPTY_FAMILY: &str = "EMPTY_FAMILY";
pub const FAMILY_TOO_LARGE: &str = "FAMILY_TOO_LARGE";
pub const UNKNOWN_COMMAND: &str = "UNKNOWN_COMMAND";
pub const CLASSIFIER_TABLE_ERROR: &str = "CLASSIFIER_TABLE_ERROR";
pub const CLASSIFIER_RULE_ERROR: &str = "CLASSIFIER_RULE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
