use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classification::{CapabilityFlags, RiskLevel};
use crate::errors::{CodecError, CodecResult};

/// Family-type tag carried in byte 13 of a family record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FamilyKind {
    #[default]
    Generic = 0,
    /// git, hg, svn.
    VersionControl = 1,
    /// apt, yum, pacman.
    PackageManager = 2,
    /// docker, podman, containerd.
    ContainerRuntime = 3,
    /// bcachefs, btrfs, lvm.
    StorageManagement = 4,
    /// aws, gcloud, az.
    CloudCli = 5,
    /// mysql, psql, mongo.
    Database = 6,
}

impl FamilyKind {
    pub fn from_tag(tag: u8) -> CodecResult<Self> {
        match tag {
            0 => Ok(Self::Generic),
            1 => Ok(Self::VersionControl),
            2 => Ok(Self::PackageManager),
            3 => Ok(Self::ContainerRuntime),
            4 => Ok(Self::StorageManagement),
            5 => Ok(Self::CloudCli),
            6 => Ok(Self::Database),
            other => Err(CodecError::malformed(format!(
                "unknown family kind tag {other:#04x}"
            ))),
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for FamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Generic => "generic",
            Self::VersionControl => "version_control",
            Self::PackageManager => "package_manager",
            Self::ContainerRuntime => "container_runtime",
            Self::StorageManagement => "storage_management",
            Self::CloudCli => "cloud_cli",
            Self::Database => "database",
        };
        f.write_str(label)
    }
}

/// Decoded 16-byte family-parent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FamilyDescriptor {
    pub schema_version: u16,
    pub family_hash: u32,
    /// Capability bits set in every member of the family.
    pub common_flags: CapabilityFlags,
    /// Lowest risk among all members.
    pub risk_floor: RiskLevel,
    /// Number of delta records that belong to this parent.
    pub child_count: u8,
    pub kind: FamilyKind,
    pub checksum: u16,
}
