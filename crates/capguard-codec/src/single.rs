//! 24-byte standalone descriptor.
//!
//! ```text
//! 0-1   type tag 0x0001
//! 2-3   schema version
//! 4-7   command-name hash
//! 8-11  flags word: bits 0-2 risk ordinal, bits 3-31 capability flags
//! 12    exec-time class
//! 13    memory class
//! 14-15 output-size class
//! 16-17 reserved, must be zero
//! 18-19 name length
//! 20-21 reserved, written zero and ignored
//! 22-23 CRC16 over bytes 0-21
//! ```

use capguard_core::classification::{CapabilityFlags, Classification, ClassificationInput, LogClass, RiskLevel};
use capguard_core::constants::{
    CURRENT_SCHEMA_VERSION, RISK_ORDINAL_MASK, SINGLE_RECORD_LEN, TYPE_TAG_FAMILY_DELTA,
    TYPE_TAG_FAMILY_PARENT, TYPE_TAG_SINGLE,
};
use capguard_core::errors::{CodecError, CodecResult};
use capguard_core::models::{RecordKind, ToolDescriptor};

use crate::hashing::name_hash;
use crate::integrity;
use crate::wire::{check_len, check_version, read_u16, read_u32, write_u16, write_u32};

const OFF_TAG: usize = 0;
const OFF_VERSION: usize = 2;
const OFF_HASH: usize = 4;
const OFF_FLAGS: usize = 8;
const OFF_EXEC: usize = 12;
const OFF_MEMORY: usize = 13;
const OFF_OUTPUT: usize = 14;
const OFF_RESERVED: usize = 16;
const OFF_NAME_LEN: usize = 18;

/// Encode `input` for command `name` at the current schema version.
pub fn encode(name: &str, input: &ClassificationInput) -> CodecResult<[u8; SINGLE_RECORD_LEN]> {
    encode_versioned(name, input, CURRENT_SCHEMA_VERSION)
}

/// Encode at an explicit schema version, which must be one the decoder accepts.
pub fn encode_versioned(
    name: &str,
    input: &ClassificationInput,
    schema_version: u16,
) -> CodecResult<[u8; SINGLE_RECORD_LEN]> {
    check_version(schema_version)?;
    let classification = input.validate()?;
    let name_len = u16::try_from(name.len()).unwrap_or(u16::MAX);
    Ok(write_record(
        name_hash(name),
        name_len,
        &classification,
        schema_version,
    ))
}

/// Lay out an already-validated classification. Checksum is written last.
pub fn write_record(
    hash: u32,
    name_len: u16,
    classification: &Classification,
    schema_version: u16,
) -> [u8; SINGLE_RECORD_LEN] {
    let mut record = [0u8; SINGLE_RECORD_LEN];
    let word = classification.capabilities.bits() | u32::from(classification.risk.ordinal());

    write_u16(&mut record, OFF_TAG, TYPE_TAG_SINGLE);
    write_u16(&mut record, OFF_VERSION, schema_version);
    write_u32(&mut record, OFF_HASH, hash);
    write_u32(&mut record, OFF_FLAGS, word);
    record[OFF_EXEC] = classification.exec_time_class.value();
    record[OFF_MEMORY] = classification.memory_class.value();
    write_u16(
        &mut record,
        OFF_OUTPUT,
        u16::from(classification.output_size_class.value()),
    );
    write_u16(&mut record, OFF_NAME_LEN, name_len);

    integrity::seal(&mut record);
    record
}

/// Decode a standalone record. All-or-nothing: on error no field is exposed.
pub fn decode(bytes: &[u8]) -> CodecResult<ToolDescriptor> {
    check_len(bytes, SINGLE_RECORD_LEN, "single")?;
    integrity::verify(bytes)?;

    match read_u16(bytes, OFF_TAG) {
        TYPE_TAG_SINGLE => {}
        tag @ (TYPE_TAG_FAMILY_PARENT | TYPE_TAG_FAMILY_DELTA) => {
            return Err(CodecError::malformed(format!(
                "type tag {tag:#06x} belongs to a family record"
            )));
        }
        tag => {
            return Err(CodecError::malformed(format!("unknown type tag {tag:#06x}")));
        }
    }

    let schema_version = read_u16(bytes, OFF_VERSION);
    check_version(schema_version)?;

    let reserved = read_u16(bytes, OFF_RESERVED);
    if reserved != 0 {
        return Err(CodecError::malformed(format!(
            "reserved field is {reserved:#06x}, must be zero"
        )));
    }

    let word = read_u32(bytes, OFF_FLAGS);
    let risk = RiskLevel::from_ordinal((word & RISK_ORDINAL_MASK) as u8)?;

    Ok(ToolDescriptor {
        kind: RecordKind::Single,
        schema_version,
        name_hash: read_u32(bytes, OFF_HASH),
        risk,
        capabilities: CapabilityFlags::from_word(word),
        exec_time_class: LogClass::new("exec_time", u16::from(bytes[OFF_EXEC]))?,
        memory_class: LogClass::new("memory", u16::from(bytes[OFF_MEMORY]))?,
        output_size_class: LogClass::new("output_size", read_u16(bytes, OFF_OUTPUT))?,
        name_len: read_u16(bytes, OFF_NAME_LEN),
    })
}
