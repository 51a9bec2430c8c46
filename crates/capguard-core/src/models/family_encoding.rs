use serde::{Deserialize, Serialize};

use super::{
    CompressionReport, DeltaDescriptor, EncodedDelta, FamilyDescriptor, FamilyKind,
};
use crate::classification::ClassifiedCommand;
use crate::constants::{FAMILY_RECORD_LEN, SINGLE_RECORD_LEN};

/// Siblings to aggregate under one parent tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyInput {
    pub name: String,
    #[serde(default)]
    pub kind: FamilyKind,
    /// Children named by subcommand only (`status`, not `git status`).
    pub children: Vec<ClassifiedCommand>,
}

impl FamilyInput {
    pub fn new(name: impl Into<String>, kind: FamilyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: ClassifiedCommand) -> Self {
        self.children.push(child);
        self
    }

    /// Full command line of a child, as used for standalone records.
    pub fn qualified_name(&self, child: &str) -> String {
        format!("{} {child}", self.name)
    }
}

/// A standalone 24-byte record and the name it was encoded under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandaloneDescriptor {
    pub name: String,
    pub bytes: [u8; SINGLE_RECORD_LEN],
}

/// Output of a successful family aggregation: one parent, N deltas, and any
/// overflowed children as standalone records.
#[derive(Debug, Clone)]
pub struct FamilyEncoding {
    pub name: String,
    pub family: FamilyDescriptor,
    pub family_bytes: [u8; FAMILY_RECORD_LEN],
    /// Subcommand names, index-aligned with `deltas` and `delta_bytes`.
    pub member_names: Vec<String>,
    pub deltas: Vec<DeltaDescriptor>,
    pub delta_bytes: Vec<EncodedDelta>,
    pub standalone: Vec<StandaloneDescriptor>,
    pub report: CompressionReport,
}

impl FamilyEncoding {
    /// Borrowed delta records, in the shape `decode_family` takes.
    pub fn delta_slices(&self) -> Vec<&[u8]> {
        self.delta_bytes.iter().map(EncodedDelta::as_bytes).collect()
    }
}

/// Result of asking for a family aggregation.
#[derive(Debug, Clone)]
pub enum AggregationOutcome {
    Family(FamilyEncoding),
    /// Aggregation would not pay for itself; every child is standalone.
    NotBeneficial {
        singles: Vec<StandaloneDescriptor>,
        report: CompressionReport,
    },
}

impl AggregationOutcome {
    pub fn report(&self) -> &CompressionReport {
        match self {
            Self::Family(encoding) => &encoding.report,
            Self::NotBeneficial { report, .. } => report,
        }
    }

    pub fn is_family(&self) -> bool {
        matches!(self, Self::Family(_))
    }

    pub fn into_family(self) -> Option<FamilyEncoding> {
        match self {
            Self::Family(encoding) => Some(encoding),
            Self::NotBeneficial { .. } => None,
        }
    }
}
