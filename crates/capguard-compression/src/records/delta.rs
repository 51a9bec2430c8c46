//! Per-child delta record, 6 or 8 bytes.
//!
//! ```text
//! 0      subcommand hash
//! 1-2    bits 15-13 risk delta, bits 12-0 delta flags >> 3
//! 3      exec-time class << 4 | memory class
//! 4..n-2 metadata segment (0 or 2 bytes)
//! n-2..n CRC16 over bytes 0..n-2
//! ```

use capguard_codec::integrity;
use capguard_codec::metadata::DeltaMetadata;
use capguard_codec::wire::{read_u16, write_u16};
use capguard_core::classification::{CapabilityFlags, LogClass};
use capguard_core::constants::{
    CHECKSUM_LEN, DELTA_BASE_LEN, DELTA_MAX_LEN, DELTA_METADATA_MAX_LEN, MAX_RISK_DELTA,
};
use capguard_core::errors::{CodecError, CodecResult};
use capguard_core::models::{DeltaDescriptor, EncodedDelta};

const OFF_HASH: usize = 0;
const OFF_WORD: usize = 1;
const OFF_PERF: usize = 3;
const OFF_METADATA: usize = 4;

const RISK_DELTA_SHIFT: u16 = 13;
/// Delta flags are word bits 3-15, stored shifted down to bits 0-12.
const FLAG_SHIFT: u32 = 3;
const FLAG_FIELD_MASK: u16 = 0x1FFF;

/// Fields of a delta record before it is checksummed.
#[derive(Debug, Clone, Copy)]
pub struct DeltaFields {
    pub subcommand_hash: u8,
    pub risk_delta: u8,
    pub delta_flags: CapabilityFlags,
    pub exec_time_class: LogClass,
    pub memory_class: LogClass,
    pub metadata: DeltaMetadata,
}

/// Encode a delta. Fails when the risk delta or flags do not fit the record;
/// the aggregator routes such children to standalone records beforehand.
pub fn encode(fields: &DeltaFields) -> CodecResult<EncodedDelta> {
    if fields.risk_delta > MAX_RISK_DELTA {
        return Err(CodecError::malformed(format!(
            "risk delta {} does not fit in 3 bits",
            fields.risk_delta
        )));
    }
    if !fields.delta_flags.is_core_only() {
        return Err(CodecError::malformed(format!(
            "delta flags {:#010x} fall outside the core window",
            fields.delta_flags.bits()
        )));
    }

    let mut buf = [0u8; DELTA_MAX_LEN];
    let flag_field = (fields.delta_flags.bits() >> FLAG_SHIFT) as u16 & FLAG_FIELD_MASK;
    let word = (u16::from(fields.risk_delta) << RISK_DELTA_SHIFT) | flag_field;

    buf[OFF_HASH] = fields.subcommand_hash;
    write_u16(&mut buf, OFF_WORD, word);
    buf[OFF_PERF] = LogClass::pack(fields.exec_time_class, fields.memory_class);

    let mut segment = [0u8; DELTA_METADATA_MAX_LEN];
    let metadata_len = fields.metadata.write(&mut segment);
    buf[OFF_METADATA..OFF_METADATA + metadata_len].copy_from_slice(&segment[..metadata_len]);

    let len = DELTA_BASE_LEN + metadata_len;
    integrity::seal(&mut buf[..len]);
    EncodedDelta::from_slice(&buf[..len])
}

/// Decode one delta record. Checksum first, then the metadata segment.
pub fn decode(bytes: &[u8]) -> CodecResult<DeltaDescriptor> {
    if !(DELTA_BASE_LEN..=DELTA_MAX_LEN).contains(&bytes.len()) {
        return Err(CodecError::malformed(format!(
            "delta record is {} bytes, expected {DELTA_BASE_LEN}-{DELTA_MAX_LEN}",
            bytes.len()
        )));
    }
    let checksum = integrity::verify(bytes)?;
    let metadata = DeltaMetadata::parse(&bytes[OFF_METADATA..bytes.len() - CHECKSUM_LEN])?;

    let word = read_u16(bytes, OFF_WORD);
    let (exec_time_class, memory_class) = LogClass::unpack(bytes[OFF_PERF]);

    Ok(DeltaDescriptor {
        subcommand_hash: bytes[OFF_HASH],
        risk_delta: (word >> RISK_DELTA_SHIFT) as u8,
        delta_flags: CapabilityFlags::from_word(u32::from(word & FLAG_FIELD_MASK) << FLAG_SHIFT),
        exec_time_class,
        memory_class,
        output_size_class: metadata.output_size_class,
        checksum,
    })
}
