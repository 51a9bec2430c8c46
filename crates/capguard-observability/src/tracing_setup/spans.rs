//! Span definitions for the aggregation, decode and publish paths.

/// Span around one family aggregation.
#[macro_export]
macro_rules! aggregation_span {
    ($family:expr, $children:expr) => {
        tracing::info_span!("capguard.aggregate", family = %$family, children = $children)
    };
}

/// Span around decoding one family's records.
#[macro_export]
macro_rules! decode_family_span {
    ($deltas:expr) => {
        tracing::debug_span!("capguard.decode_family", deltas = $deltas)
    };
}

/// Span around publishing a family to a registry.
#[macro_export]
macro_rules! publish_span {
    ($family:expr) => {
        tracing::info_span!("capguard.publish", family = %$family)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const AGGREGATE: &str = "capguard.aggregate";
    pub const DECODE_FAMILY: &str = "capguard.decode_family";
    pub const PUBLISH: &str = "capguard.publish";
}
