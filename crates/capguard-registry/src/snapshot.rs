use chrono::{DateTime, Utc};
use serde::Serialize;

use capguard_core::constants::FAMILY_RECORD_LEN;
use capguard_core::models::{DeltaDescriptor, EncodedDelta, FamilyDescriptor, ToolDescriptor};

/// One published version of a family. Immutable once it is in the registry.
#[derive(Debug, Clone, Serialize)]
pub struct FamilySnapshot {
    pub(crate) name: String,
    pub(crate) generation: u64,
    pub(crate) published_at: DateTime<Utc>,
    pub(crate) family: FamilyDescriptor,
    #[serde(skip)]
    pub(crate) family_bytes: [u8; FAMILY_RECORD_LEN],
    pub(crate) member_names: Vec<String>,
    pub(crate) deltas: Vec<DeltaDescriptor>,
    #[serde(skip)]
    pub(crate) delta_bytes: Vec<EncodedDelta>,
    /// Children reconstructed while staging, index-aligned with `deltas`.
    pub(crate) children: Vec<ToolDescriptor>,
    /// Full names of the overflowed children this publication stored as
    /// standalone entries.
    pub(crate) standalone_names: Vec<String>,
}

impl FamilySnapshot {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registry-wide publication counter at the time this snapshot went live.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    pub fn family(&self) -> &FamilyDescriptor {
        &self.family
    }

    pub fn deltas(&self) -> &[DeltaDescriptor] {
        &self.deltas
    }

    pub fn member_names(&self) -> &[String] {
        &self.member_names
    }

    pub fn children(&self) -> &[ToolDescriptor] {
        &self.children
    }

    pub fn standalone_names(&self) -> &[String] {
        &self.standalone_names
    }

    /// Member subcommands paired with their reconstructed descriptors.
    pub fn members(&self) -> impl Iterator<Item = (&str, &ToolDescriptor)> {
        self.member_names
            .iter()
            .map(String::as_str)
            .zip(self.children.iter())
    }

    pub fn family_bytes(&self) -> &[u8; FAMILY_RECORD_LEN] {
        &self.family_bytes
    }

    pub fn delta_slices(&self) -> Vec<&[u8]> {
        self.delta_bytes.iter().map(EncodedDelta::as_bytes).collect()
    }

    /// The reconstructed descriptor for one subcommand.
    pub fn child(&self, subcommand: &str) -> Option<ToolDescriptor> {
        self.member_names
            .iter()
            .position(|name| name == subcommand)
            .map(|i| self.children[i])
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
