use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use crate::constants::{CAPABILITY_MASK, CORE_CAPABILITY_MASK, EXTENSION_CAPABILITY_MASK};
use crate::errors::{CodecError, CodecResult};

/// Set of capability flags, stored at their flags-word bit positions (3-31).
///
/// Bits 0-2 are never set: they belong to the risk ordinal. Keeping the word
/// alignment means `flags.bits() | risk` is the on-wire flags word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CapabilityFlags(u32);

impl CapabilityFlags {
    pub const DESTRUCTIVE: Self = Self(1 << 3);
    pub const REQUIRES_ELEVATED_PRIVILEGE: Self = Self(1 << 4);
    pub const NETWORK_ACCESS: Self = Self(1 << 5);
    pub const FILE_MODIFICATION: Self = Self(1 << 6);
    pub const SYSTEM_MODIFICATION: Self = Self(1 << 7);
    pub const PRIVILEGE_ESCALATION: Self = Self(1 << 8);
    pub const FILE_DELETION: Self = Self(1 << 9);
    pub const PROCESS_CONTROL: Self = Self(1 << 10);
    pub const IRREVERSIBLE: Self = Self(1 << 11);
    pub const ARBITRARY_CODE_EXECUTION: Self = Self(1 << 12);
    pub const READS_SENSITIVE_DATA: Self = Self(1 << 13);
    pub const RECURSIVE: Self = Self(1 << 14);

    /// Named core flags, in bit order.
    pub const NAMED: [(&'static str, Self); 12] = [
        ("DESTRUCTIVE", Self::DESTRUCTIVE),
        ("REQUIRES_ELEVATED_PRIVILEGE", Self::REQUIRES_ELEVATED_PRIVILEGE),
        ("NETWORK_ACCESS", Self::NETWORK_ACCESS),
        ("FILE_MODIFICATION", Self::FILE_MODIFICATION),
        ("SYSTEM_MODIFICATION", Self::SYSTEM_MODIFICATION),
        ("PRIVILEGE_ESCALATION", Self::PRIVILEGE_ESCALATION),
        ("FILE_DELETION", Self::FILE_DELETION),
        ("PROCESS_CONTROL", Self::PROCESS_CONTROL),
        ("IRREVERSIBLE", Self::IRREVERSIBLE),
        ("ARBITRARY_CODE_EXECUTION", Self::ARBITRARY_CODE_EXECUTION),
        ("READS_SENSITIVE_DATA", Self::READS_SENSITIVE_DATA),
        ("RECURSIVE", Self::RECURSIVE),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Validate raw word-aligned bits. Bits 0-2 must be clear.
    pub fn from_bits(bits: u32) -> CodecResult<Self> {
        if bits & !CAPABILITY_MASK != 0 {
            return Err(CodecError::InvalidCapabilityFlags { bits });
        }
        Ok(Self(bits))
    }

    /// Take the capability part of a flags word, dropping the risk bits.
    pub const fn from_word(word: u32) -> Self {
        Self(word & CAPABILITY_MASK)
    }

    /// Domain-extension flag `index` (0-12), i.e. word bit `16 + index`.
    pub fn extension(index: u8) -> Option<Self> {
        (index < 13).then(|| Self(1 << (16 + u32::from(index))))
    }

    /// Look up a named core flag (upper-snake, case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, flag)| *flag)
    }

    /// Names of the core flags present. Extension bits have no name.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Flags in `self` that are not in `other`.
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Flags within word bits 3-15.
    pub const fn core(self) -> Self {
        Self(self.0 & CORE_CAPABILITY_MASK)
    }

    /// Flags within word bits 16-28.
    pub const fn extensions(self) -> Self {
        Self(self.0 & EXTENSION_CAPABILITY_MASK)
    }

    /// True when every set bit lies in the core window.
    pub const fn is_core_only(self) -> bool {
        self.0 & !CORE_CAPABILITY_MASK == 0
    }

    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for CapabilityFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitAnd for CapabilityFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl Not for CapabilityFlags {
    type Output = Self;
    fn not(self) -> Self {
        Self(!self.0 & CAPABILITY_MASK)
    }
}

impl FromIterator<CapabilityFlags> for CapabilityFlags {
    fn from_iter<I: IntoIterator<Item = CapabilityFlags>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::union)
    }
}

impl TryFrom<u32> for CapabilityFlags {
    type Error = CodecError;

    fn try_from(bits: u32) -> CodecResult<Self> {
        Self::from_bits(bits)
    }
}

impl From<CapabilityFlags> for u32 {
    fn from(flags: CapabilityFlags) -> Self {
        flags.0
    }
}

impl fmt::Display for CapabilityFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{}");
        }
        let mut parts: Vec<String> = self.names().into_iter().map(str::to_string).collect();
        let unnamed = self.difference(Self::NAMED.iter().map(|(_, flag)| *flag).collect());
        if !unnamed.is_empty() {
            parts.push(format!("{:#010x}", unnamed.bits()));
        }
        write!(f, "{{{}}}", parts.join(", "))
    }
}
