//! # capguard-registry
//!
//! Key → descriptor store shared between producers and consumers.
//! Sharded per-key locking via `DashMap`; families are published as one
//! immutable snapshot behind an `Arc`, so readers never see a family with
//! some children updated and others stale.

pub mod registry;
pub mod snapshot;
pub mod stats;

pub use registry::{DescriptorRegistry, RegistryEntry};
pub use snapshot::FamilySnapshot;
pub use stats::RegistryStats;
