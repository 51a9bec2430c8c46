use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::MAX_LOG_CLASS;
use crate::errors::{CodecError, CodecResult};

/// Log-scale magnitude class in `0..=15`.
///
/// Class `c` stands for roughly `unit × 2^c`, where the unit depends on the
/// measured quantity (see the `*_UNIT_*` constants).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct LogClass(u8);

impl LogClass {
    pub const MIN: LogClass = LogClass(0);
    pub const MAX: LogClass = LogClass(MAX_LOG_CLASS);

    /// Validate a class value. `field` names the quantity for the error.
    pub fn new(field: &'static str, value: u16) -> CodecResult<Self> {
        if value > u16::from(MAX_LOG_CLASS) {
            return Err(CodecError::InvalidPerformanceClass { field, value });
        }
        Ok(Self(value as u8))
    }

    /// Bucket a raw magnitude: `min(15, floor(log2(max(1, value / unit))))`.
    ///
    /// This is the producer-side helper for turning a measurement into a
    /// class; saturating at 15 is part of the scale, not a validation step.
    pub fn from_scaled(value: u64, unit: u64) -> Self {
        let scaled = (value / unit.max(1)).max(1);
        let class = scaled.ilog2().min(u32::from(MAX_LOG_CLASS));
        Self(class as u8)
    }

    /// Upper magnitude this class represents: `unit × 2^class`.
    pub fn upper_bound(self, unit: u64) -> u64 {
        unit.saturating_mul(1u64 << self.0)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Pack two classes into one byte, `high` in the upper nibble.
    pub const fn pack(high: LogClass, low: LogClass) -> u8 {
        (high.0 << 4) | low.0
    }

    /// Inverse of [`LogClass::pack`]. Every byte is a valid pair.
    pub const fn unpack(byte: u8) -> (LogClass, LogClass) {
        (LogClass(byte >> 4), LogClass(byte & 0x0F))
    }
}

impl fmt::Display for LogClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl TryFrom<u8> for LogClass {
    type Error = CodecError;

    fn try_from(value: u8) -> CodecResult<Self> {
        Self::new("performance", u16::from(value))
    }
}

impl From<LogClass> for u8 {
    fn from(class: LogClass) -> Self {
        class.0
    }
}
