use serde::{Deserialize, Serialize};

use crate::classification::{CapabilityFlags, LogClass};
use crate::constants::{DELTA_BASE_LEN, DELTA_MAX_LEN};
use crate::errors::{CodecError, CodecResult};

/// Decoded per-child delta record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeltaDescriptor {
    pub subcommand_hash: u8,
    /// Child risk minus the family's risk floor (3 bits).
    pub risk_delta: u8,
    /// Child flags not already in the family's common flags.
    pub delta_flags: CapabilityFlags,
    pub exec_time_class: LogClass,
    pub memory_class: LogClass,
    /// Carried in the optional metadata segment; `None` means class 0.
    pub output_size_class: Option<LogClass>,
    pub checksum: u16,
}

impl DeltaDescriptor {
    /// Length of the encoded record, 6 or 8 bytes.
    pub fn encoded_len(&self) -> usize {
        match self.output_size_class {
            Some(_) => DELTA_MAX_LEN,
            None => DELTA_BASE_LEN,
        }
    }
}

/// Inline buffer for one encoded delta record (6-8 bytes, no heap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodedDelta {
    buf: [u8; DELTA_MAX_LEN],
    len: u8,
}

impl EncodedDelta {
    /// Copy a record out of `bytes`. Only the length is checked here.
    pub fn from_slice(bytes: &[u8]) -> CodecResult<Self> {
        if !(DELTA_BASE_LEN..=DELTA_MAX_LEN).contains(&bytes.len()) {
            return Err(CodecError::malformed(format!(
                "delta record is {} bytes, expected {DELTA_BASE_LEN}-{DELTA_MAX_LEN}",
                bytes.len()
            )));
        }
        let mut buf = [0u8; DELTA_MAX_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            buf,
            len: bytes.len() as u8,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..usize::from(self.len)]
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u8]> for EncodedDelta {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
