//! Field access shared by every record layout.

use capguard_core::constants::SUPPORTED_SCHEMA_VERSIONS;
use capguard_core::errors::{CodecError, CodecResult};

/// Big-endian u16 at `at`. Callers have already checked the record length.
#[inline]
pub fn read_u16(record: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([record[at], record[at + 1]])
}

/// Big-endian u32 at `at`. Callers have already checked the record length.
#[inline]
pub fn read_u32(record: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([record[at], record[at + 1], record[at + 2], record[at + 3]])
}

#[inline]
pub fn write_u16(record: &mut [u8], at: usize, value: u16) {
    record[at..at + 2].copy_from_slice(&value.to_be_bytes());
}

#[inline]
pub fn write_u32(record: &mut [u8], at: usize, value: u32) {
    record[at..at + 4].copy_from_slice(&value.to_be_bytes());
}

pub fn check_version(version: u16) -> CodecResult<()> {
    if SUPPORTED_SCHEMA_VERSIONS.contains(&version) {
        Ok(())
    } else {
        Err(CodecError::UnsupportedVersion { version })
    }
}

/// Check an exact record length before anything else is read.
pub fn check_len(record: &[u8], expected: usize, what: &str) -> CodecResult<()> {
    if record.len() != expected {
        return Err(CodecError::malformed(format!(
            "{what} record is {} bytes, expected {expected}",
            record.len()
        )));
    }
    Ok(())
}
