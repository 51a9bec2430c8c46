//! # capguard-compression
//!
//! Two-level compression of command families: one 16-byte parent record
//! carrying what every sibling shares, plus a 6-8 byte delta per child.
//!
//! ## Pipeline
//!
//! | Step | Module |
//! |------|--------|
//! | Group `"parent sub"` command lines by parent | `grouping` |
//! | Common flags, risk floor, per-child deltas, overflow | `partition` |
//! | Parent and delta wire layouts | `records` |
//! | Aggregate, decode atomically, batch in parallel | `engine` |

pub mod engine;
pub mod grouping;
pub mod partition;
pub mod records;

pub use engine::{
    decode_family, decode_family_records, reconstruct, DecodedFamily, FamilyAggregator,
};
pub use grouping::{group_command_families, infer_family_kind, CommandGroups};
pub use partition::FamilyPlan;
