//! 16-byte family-parent record.
//!
//! ```text
//! 0-1   type tag 0x0002
//! 2-3   schema version
//! 4-7   family-name hash
//! 8-11  bits 0-2 risk floor, bits 3-31 common flags
//! 12    child count
//! 13    family kind
//! 14-15 CRC16 over bytes 0-13
//! ```

use capguard_codec::integrity;
use capguard_codec::wire::{check_len, check_version, read_u16, read_u32, write_u16, write_u32};
use capguard_core::classification::{CapabilityFlags, RiskLevel};
use capguard_core::constants::{FAMILY_RECORD_LEN, RISK_ORDINAL_MASK, TYPE_TAG_FAMILY_PARENT};
use capguard_core::errors::{CodecError, CodecResult};
use capguard_core::models::{FamilyDescriptor, FamilyKind};

const OFF_TAG: usize = 0;
const OFF_VERSION: usize = 2;
const OFF_HASH: usize = 4;
const OFF_FLAGS: usize = 8;
const OFF_COUNT: usize = 12;
const OFF_KIND: usize = 13;

/// Fields of a parent record before it is checksummed.
#[derive(Debug, Clone, Copy)]
pub struct FamilyHeader {
    pub schema_version: u16,
    pub family_hash: u32,
    pub common_flags: CapabilityFlags,
    pub risk_floor: RiskLevel,
    pub child_count: u8,
    pub kind: FamilyKind,
}

pub fn encode(header: &FamilyHeader) -> [u8; FAMILY_RECORD_LEN] {
    let mut record = [0u8; FAMILY_RECORD_LEN];
    let word = header.common_flags.bits() | u32::from(header.risk_floor.ordinal());

    write_u16(&mut record, OFF_TAG, TYPE_TAG_FAMILY_PARENT);
    write_u16(&mut record, OFF_VERSION, header.schema_version);
    write_u32(&mut record, OFF_HASH, header.family_hash);
    write_u32(&mut record, OFF_FLAGS, word);
    record[OFF_COUNT] = header.child_count;
    record[OFF_KIND] = header.kind.tag();

    integrity::seal(&mut record);
    record
}

/// Decode a parent record: length, checksum, tag, version, kind, floor.
pub fn decode(bytes: &[u8]) -> CodecResult<FamilyDescriptor> {
    check_len(bytes, FAMILY_RECORD_LEN, "family")?;
    let checksum = integrity::verify(bytes)?;

    let tag = read_u16(bytes, OFF_TAG);
    if tag != TYPE_TAG_FAMILY_PARENT {
        return Err(CodecError::malformed(format!(
            "type tag {tag:#06x} is not a family parent"
        )));
    }

    let schema_version = read_u16(bytes, OFF_VERSION);
    check_version(schema_version)?;

    let kind = FamilyKind::from_tag(bytes[OFF_KIND])?;
    let word = read_u32(bytes, OFF_FLAGS);

    Ok(FamilyDescriptor {
        schema_version,
        family_hash: read_u32(bytes, OFF_HASH),
        common_flags: CapabilityFlags::from_word(word),
        risk_floor: RiskLevel::from_ordinal((word & RISK_ORDINAL_MASK) as u8)?,
        child_count: bytes[OFF_COUNT],
        kind,
        checksum,
    })
}
