use capguard_core::classification::ClassificationInput;
use capguard_core::config::CodecConfig;
use capguard_core::constants::{CURRENT_SCHEMA_VERSION, SINGLE_RECORD_LEN};
use capguard_core::errors::CodecResult;
use capguard_core::models::ToolDescriptor;

use crate::{single, wire};

/// Single-record codec bound to the schema version it writes.
///
/// Decoding accepts every supported version regardless of which one this
/// codec writes.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorCodec {
    schema_version: u16,
}

impl DescriptorCodec {
    pub fn new() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn from_config(config: &CodecConfig) -> CodecResult<Self> {
        wire::check_version(config.schema_version)?;
        Ok(Self {
            schema_version: config.schema_version,
        })
    }

    pub fn schema_version(&self) -> u16 {
        self.schema_version
    }

    pub fn encode(
        &self,
        name: &str,
        input: &ClassificationInput,
    ) -> CodecResult<[u8; SINGLE_RECORD_LEN]> {
        single::encode_versioned(name, input, self.schema_version)
    }

    pub fn decode(&self, bytes: &[u8]) -> CodecResult<ToolDescriptor> {
        single::decode(bytes)
    }
}

impl Default for DescriptorCodec {
    fn default() -> Self {
        Self::new()
    }
}
