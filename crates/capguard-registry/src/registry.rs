//! DescriptorRegistry: sharded key → descriptor store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use capguard_codec::{name_hash, subcommand_hash};
use capguard_compression::{decode_family_records, DecodedFamily};
use capguard_core::classification::{CapabilityFlags, RiskLevel};
use capguard_core::config::{CapguardConfig, RegistryConfig};
use capguard_core::errors::{AggregationError, CodecResult, ErrorCode};
use capguard_core::models::{
    AggregationOutcome, DeltaDescriptor, FamilyDescriptor, FamilyEncoding, StandaloneDescriptor,
    ToolDescriptor,
};
use capguard_core::traits::IDescriptorStore;
use capguard_observability::publish_span;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::snapshot::FamilySnapshot;
use crate::stats::RegistryStats;

/// What a key maps to.
#[derive(Debug, Clone)]
pub enum RegistryEntry {
    Single(ToolDescriptor),
    Family(Arc<FamilySnapshot>),
}

/// Thread-safe descriptor registry.
///
/// Reads never block on writes to other keys. Writes to one key are
/// serialized by that key's shard lock. Only verified descriptors are ever
/// stored.
pub struct DescriptorRegistry {
    entries: DashMap<String, RegistryEntry>,
    generation: AtomicU64,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::with_config(&RegistryConfig::default())
    }

    pub fn with_config(config: &RegistryConfig) -> Self {
        let shards = config.shard_amount.max(2).next_power_of_two();
        Self {
            entries: DashMap::with_capacity_and_shard_amount(config.initial_capacity, shards),
            generation: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &CapguardConfig) -> Self {
        Self::with_config(&config.registry)
    }

    /// Store a decoded descriptor, replacing whatever `name` held.
    pub fn put(&self, name: impl Into<String>, descriptor: ToolDescriptor) {
        let name = name.into();
        debug!(name = %name, risk = %descriptor.risk, "descriptor stored");
        self.entries.insert(name, RegistryEntry::Single(descriptor));
    }

    /// Decode `bytes` and store the result. Nothing is stored on error.
    pub fn put_encoded(&self, name: impl Into<String>, bytes: &[u8]) -> CodecResult<ToolDescriptor> {
        let name = name.into();
        match capguard_codec::decode(bytes) {
            Ok(descriptor) => {
                self.put(name, descriptor);
                Ok(descriptor)
            }
            Err(e) => {
                warn!(name = %name, code = e.error_code(), error = %e, "rejected encoded descriptor");
                Err(e)
            }
        }
    }

    /// The standalone descriptor for `name`. `None` is the normal miss.
    pub fn get(&self, name: &str) -> Option<ToolDescriptor> {
        match self.entries.get(name)?.value() {
            RegistryEntry::Single(descriptor) => Some(*descriptor),
            RegistryEntry::Family(_) => None,
        }
    }

    /// The current snapshot of family `name`.
    pub fn family(&self, name: &str) -> Option<Arc<FamilySnapshot>> {
        match self.entries.get(name)?.value() {
            RegistryEntry::Family(snapshot) => Some(Arc::clone(snapshot)),
            RegistryEntry::Single(_) => None,
        }
    }

    /// Reconstructed children of family `name`, from its current snapshot.
    pub fn resolve_family(&self, name: &str) -> Option<Vec<ToolDescriptor>> {
        self.family(name).map(|snapshot| snapshot.children().to_vec())
    }

    /// One child of a family, by subcommand.
    pub fn get_child(&self, family: &str, subcommand: &str) -> Option<ToolDescriptor> {
        self.family(family)?.child(subcommand)
    }

    /// Resolve a full command line: a family member first, then a standalone
    /// descriptor stored under the whole line.
    pub fn lookup(&self, command: &str) -> Option<ToolDescriptor> {
        let command = command.trim();
        if let Some((parent, sub)) = command.split_once(char::is_whitespace) {
            let sub = sub.split_whitespace().collect::<Vec<_>>().join(" ");
            if let Some(child) = self.get_child(parent, &sub) {
                return Some(child);
            }
        }
        self.get(command)
    }

    /// Verify, stage and atomically publish a family.
    ///
    /// Everything stored comes from the re-decoded records, never from the
    /// typed fields of `encoding`; member and standalone names must hash to
    /// the values in those records. Overflowed children are stored before the
    /// swap, so a reader resolving a child finds it in the old snapshot, the
    /// new one, or its standalone entry. The swap itself is a single insert
    /// under the key's entry lock. Standalone entries the previous snapshot
    /// owned and this one does not are removed afterwards.
    pub fn publish_family(
        &self,
        encoding: &FamilyEncoding,
    ) -> Result<Arc<FamilySnapshot>, AggregationError> {
        let _span = publish_span!(encoding.name).entered();
        let decoded = decode_family_records(&encoding.family_bytes, &encoding.delta_slices())?;
        check_member_names(encoding, &decoded)?;
        let standalone = decode_standalone(&encoding.standalone)?;
        if let Some((name, _)) = standalone
            .iter()
            .find(|(name, _)| parent_of(name) != Some(encoding.name.as_str()))
        {
            return Err(AggregationError::integrity(format!(
                "standalone {name} is not a member of {}",
                encoding.name
            )));
        }

        let standalone_names: Vec<String> =
            standalone.iter().map(|(name, _)| name.clone()).collect();
        for (name, descriptor) in standalone {
            self.put(name, descriptor);
        }

        let DecodedFamily {
            family,
            deltas,
            children,
        } = decoded;
        let slot = self.entries.entry(encoding.name.clone());
        let snapshot = Arc::new(FamilySnapshot {
            name: encoding.name.clone(),
            generation: self.next_generation(),
            published_at: Utc::now(),
            family,
            family_bytes: encoding.family_bytes,
            member_names: encoding.member_names.clone(),
            deltas,
            delta_bytes: encoding.delta_bytes.clone(),
            children,
            standalone_names,
        });
        let published = RegistryEntry::Family(Arc::clone(&snapshot));
        let previous = match slot {
            Entry::Occupied(mut occupied) => Some(occupied.insert(published)),
            Entry::Vacant(vacant) => {
                vacant.insert(published);
                None
            }
        };

        if let Some(RegistryEntry::Family(previous)) = previous {
            self.retire_standalone(&previous, snapshot.standalone_names());
        }

        info!(
            family = %snapshot.name(),
            generation = snapshot.generation(),
            children = snapshot.len(),
            standalone = snapshot.standalone_names().len(),
            "family published"
        );
        Ok(snapshot)
    }

    /// Publish whatever an aggregation produced: a family, or its members as
    /// standalone descriptors.
    pub fn publish_outcome(
        &self,
        outcome: &AggregationOutcome,
    ) -> Result<Option<Arc<FamilySnapshot>>, AggregationError> {
        match outcome {
            AggregationOutcome::Family(encoding) => self.publish_family(encoding).map(Some),
            AggregationOutcome::NotBeneficial { singles, .. } => {
                for (name, descriptor) in decode_standalone(singles)? {
                    self.put(name, descriptor);
                }
                Ok(None)
            }
        }
    }

    /// Remove a key. Removing a family also removes the standalone entries
    /// its overflowed children were stored under.
    pub fn remove(&self, name: &str) -> Option<RegistryEntry> {
        let (_, entry) = self.entries.remove(name)?;
        if let RegistryEntry::Family(snapshot) = &entry {
            self.retire_standalone(snapshot, &[]);
        }
        Some(entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of keys, singles and families alike.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|r| r.key().clone()).collect();
        names.sort_unstable();
        names
    }

    /// Command names starting with `prefix`, family members included as
    /// `"<family> <subcommand>"`. Family keys themselves are not listed.
    pub fn names_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.commands_matching(|name, _| name.starts_with(prefix))
    }

    /// Commands whose descriptor carries every flag in `flags`.
    pub fn find_by_capability(&self, flags: CapabilityFlags) -> Vec<String> {
        self.commands_matching(|_, descriptor| descriptor.capabilities.contains(flags))
    }

    /// Commands at `min` risk or above.
    pub fn find_by_risk(&self, min: RiskLevel) -> Vec<String> {
        self.commands_matching(|_, descriptor| descriptor.risk >= min)
    }

    /// Sorted, deduplicated names of every single and family member that
    /// satisfies `predicate`. Family members are read from one snapshot each.
    fn commands_matching(
        &self,
        predicate: impl Fn(&str, &ToolDescriptor) -> bool,
    ) -> Vec<String> {
        let mut names = Vec::new();
        for entry in self.entries.iter() {
            match entry.value() {
                RegistryEntry::Single(descriptor) => {
                    if predicate(entry.key(), descriptor) {
                        names.push(entry.key().clone());
                    }
                }
                RegistryEntry::Family(snapshot) => {
                    for (member, descriptor) in snapshot.members() {
                        let name = format!("{} {member}", snapshot.name());
                        if predicate(&name, descriptor) {
                            names.push(name);
                        }
                    }
                }
            }
        }
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            publishes: self.generation.load(Ordering::Acquire),
            ..RegistryStats::default()
        };
        for entry in self.entries.iter() {
            match entry.value() {
                RegistryEntry::Single(_) => stats.singles += 1,
                RegistryEntry::Family(snapshot) => {
                    stats.families += 1;
                    stats.family_children += snapshot.len();
                }
            }
        }
        stats
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Drop standalone entries `previous` owned that are not in `keep`.
    /// Keys since replaced by a family are left alone.
    fn retire_standalone(&self, previous: &FamilySnapshot, keep: &[String]) {
        for name in previous.standalone_names() {
            if keep.contains(name) {
                continue;
            }
            let retired = self
                .entries
                .remove_if(name, |_, entry| matches!(entry, RegistryEntry::Single(_)));
            if retired.is_some() {
                debug!(family = %previous.name(), name = %name, "stale standalone entry removed");
            }
        }
    }
}

/// Parent part of a full command line.
fn parent_of(command: &str) -> Option<&str> {
    command
        .trim()
        .split_once(char::is_whitespace)
        .map(|(parent, _)| parent)
}

/// Bind member names to the verified records: the parent must carry the
/// family's name hash and member `i` must hash to delta `i`.
fn check_member_names(
    encoding: &FamilyEncoding,
    decoded: &DecodedFamily,
) -> Result<(), AggregationError> {
    if decoded.family.family_hash != name_hash(&encoding.name) {
        return Err(AggregationError::integrity(format!(
            "family record hash {:#010x} does not match name {}",
            decoded.family.family_hash, encoding.name
        )));
    }
    if encoding.member_names.len() != decoded.deltas.len() {
        return Err(AggregationError::integrity(format!(
            "{} members named, {} delta records decoded",
            encoding.member_names.len(),
            decoded.deltas.len()
        )));
    }
    for (i, (member, delta)) in encoding.member_names.iter().zip(&decoded.deltas).enumerate() {
        if subcommand_hash(member) != delta.subcommand_hash {
            return Err(AggregationError::integrity(format!(
                "member {i} ({member}) does not match delta hash {:#04x}",
                delta.subcommand_hash
            )));
        }
        if encoding.member_names[..i].contains(member) {
            return Err(AggregationError::integrity(format!(
                "member {member} named twice"
            )));
        }
    }
    Ok(())
}

/// Decode every standalone record before any of them is stored. Each record
/// must carry the hash of the name it is stored under.
fn decode_standalone(
    records: &[StandaloneDescriptor],
) -> Result<Vec<(String, ToolDescriptor)>, AggregationError> {
    records
        .iter()
        .map(|record| {
            let descriptor = capguard_codec::decode(&record.bytes)?;
            if descriptor.name_hash != name_hash(&record.name) {
                return Err(AggregationError::integrity(format!(
                    "standalone record hash {:#010x} does not match name {}",
                    descriptor.name_hash, record.name
                )));
            }
            Ok((record.name.clone(), descriptor))
        })
        .collect()
}

impl Default for DescriptorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IDescriptorStore for DescriptorRegistry {
    fn put(&self, name: &str, descriptor: ToolDescriptor) {
        DescriptorRegistry::put(self, name, descriptor);
    }

    fn get(&self, name: &str) -> Option<ToolDescriptor> {
        DescriptorRegistry::get(self, name)
    }

    fn get_family(&self, name: &str) -> Option<(FamilyDescriptor, Vec<DeltaDescriptor>)> {
        self.family(name)
            .map(|snapshot| (*snapshot.family(), snapshot.deltas().to_vec()))
    }
}
