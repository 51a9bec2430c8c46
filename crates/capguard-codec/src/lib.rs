//! # capguard-codec
//!
//! Record-level wire format for capguard descriptors.
//!
//! | Module | Concern |
//! |--------|---------|
//! | `integrity` | CRC-16 over every byte before the checksum field |
//! | `hashing` | 32-bit command-name hash, 8-bit subcommand hash |
//! | `single` | 24-byte standalone descriptor encode/decode |
//! | `metadata` | Bounded tag-length-value trailer used by delta records |
//! | `wire` | Big-endian field access and version checks shared by all records |
//!
//! Every function here is pure and works on caller-owned buffers, so it can be
//! called from any number of threads at once.

pub mod codec;
pub mod hashing;
pub mod integrity;
pub mod metadata;
pub mod single;
pub mod wire;

pub use codec::DescriptorCodec;
pub use hashing::{name_hash, subcommand_hash};
pub use metadata::DeltaMetadata;
pub use single::{decode, encode, encode_versioned};
