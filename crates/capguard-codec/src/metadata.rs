//! Bounded tag-length-value trailer of a delta record.
//!
//! Each entry is one header byte `tag << 4 | len` followed by `len` value
//! bytes. The whole segment never exceeds [`DELTA_METADATA_MAX_LEN`], so
//! decoding it is constant-time and allocation-free.

use capguard_core::classification::LogClass;
use capguard_core::constants::DELTA_METADATA_MAX_LEN;
use capguard_core::errors::{CodecError, CodecResult};

/// Output-size class, one value byte.
pub const TAG_OUTPUT_SIZE_CLASS: u8 = 0x1;

/// Decoded metadata segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeltaMetadata {
    /// Absent means class 0.
    pub output_size_class: Option<LogClass>,
}

impl DeltaMetadata {
    /// Metadata for a child's output class. Class 0 is the default and is
    /// never written.
    pub fn for_output_class(class: LogClass) -> Self {
        Self {
            output_size_class: (class != LogClass::MIN).then_some(class),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.output_size_class.is_none()
    }

    pub fn encoded_len(&self) -> usize {
        if self.output_size_class.is_some() {
            2
        } else {
            0
        }
    }

    /// Write the segment into `out` and return the number of bytes written.
    pub fn write(&self, out: &mut [u8; DELTA_METADATA_MAX_LEN]) -> usize {
        match self.output_size_class {
            Some(class) => {
                out[0] = (TAG_OUTPUT_SIZE_CLASS << 4) | 1;
                out[1] = class.value();
                2
            }
            None => 0,
        }
    }

    /// Parse a segment. Rejects anything this writer would not produce.
    pub fn parse(segment: &[u8]) -> CodecResult<Self> {
        if segment.len() > DELTA_METADATA_MAX_LEN {
            return Err(CodecError::malformed(format!(
                "metadata segment is {} bytes, max {DELTA_METADATA_MAX_LEN}",
                segment.len()
            )));
        }

        let mut metadata = Self::default();
        let mut rest = segment;
        while let Some((&header, tail)) = rest.split_first() {
            let tag = header >> 4;
            let len = usize::from(header & 0x0F);
            if len > tail.len() {
                return Err(CodecError::malformed(format!(
                    "metadata entry {tag:#x} declares {len} bytes, {} remain",
                    tail.len()
                )));
            }
            let (value, next) = tail.split_at(len);

            match tag {
                TAG_OUTPUT_SIZE_CLASS => {
                    if metadata.output_size_class.is_some() {
                        return Err(CodecError::malformed("duplicate output-size metadata"));
                    }
                    let [byte] = value else {
                        return Err(CodecError::malformed(format!(
                            "output-size metadata is {len} bytes, expected 1"
                        )));
                    };
                    let class = LogClass::new("output_size", u16::from(*byte))?;
                    if class == LogClass::MIN {
                        return Err(CodecError::malformed(
                            "output-size class 0 must be omitted, not written",
                        ));
                    }
                    metadata.output_size_class = Some(class);
                }
                other => {
                    return Err(CodecError::malformed(format!(
                        "unknown metadata tag {other:#x}"
                    )));
                }
            }
            rest = next;
        }
        Ok(metadata)
    }
}
