use capguard_core::constants::CHECKSUM_LEN;
use capguard_core::errors::{CodecError, CodecResult};

/// Reflected polynomial of CRC-16/MODBUS.
const POLY: u16 = 0xA001;
const INIT: u16 = 0xFFFF;

const TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u16;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// CRC-16/MODBUS: reflected, init 0xFFFF, no final xor.
///
/// Detects every single-bit error and every burst of 16 bits or fewer, which
/// is what the fail-closed decode path relies on.
pub fn crc16(data: &[u8]) -> u16 {
    data.iter().fold(INIT, |crc, &byte| {
        (crc >> 8) ^ TABLE[usize::from((crc ^ u16::from(byte)) & 0xFF)]
    })
}

/// Compute the checksum over `record[..len - 2]` and write it, big-endian,
/// into the last two bytes. Always the final step of an encode.
pub fn seal(record: &mut [u8]) {
    let Some(body_len) = record.len().checked_sub(CHECKSUM_LEN) else {
        return;
    };
    let crc = crc16(&record[..body_len]);
    record[body_len..].copy_from_slice(&crc.to_be_bytes());
}

/// The checksum stored in the last two bytes of `record`.
pub fn stored_checksum(record: &[u8]) -> CodecResult<u16> {
    match record {
        [.., hi, lo] => Ok(u16::from_be_bytes([*hi, *lo])),
        _ => Err(CodecError::malformed(format!(
            "record of {} bytes has no room for a checksum",
            record.len()
        ))),
    }
}

/// Verify the trailing checksum. The first thing every decode does.
pub fn verify(record: &[u8]) -> CodecResult<u16> {
    let stored = stored_checksum(record)?;
    let computed = crc16(&record[..record.len() - CHECKSUM_LEN]);
    if stored != computed {
        return Err(CodecError::ChecksumMismatch { stored, computed });
    }
    Ok(stored)
}
