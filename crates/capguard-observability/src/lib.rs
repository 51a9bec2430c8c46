//! # capguard-observability
//!
//! Subscriber installation and the span names the other crates emit under.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, init_with_config};
