/// capguard version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// --- Record sizes ---

/// Size of a single (standalone) descriptor record.
pub const SINGLE_RECORD_LEN: usize = 24;

/// Size of a family-parent descriptor record.
pub const FAMILY_RECORD_LEN: usize = 16;

/// Fixed part of a delta record: hash, risk/flags word, performance byte, checksum.
pub const DELTA_BASE_LEN: usize = 6;

/// Upper bound on the optional tagged metadata segment of a delta record.
pub const DELTA_METADATA_MAX_LEN: usize = 2;

/// Largest delta record that can ever be produced or accepted.
pub const DELTA_MAX_LEN: usize = DELTA_BASE_LEN + DELTA_METADATA_MAX_LEN;

/// Width of the trailing checksum on every record kind.
pub const CHECKSUM_LEN: usize = 2;

// --- Type tags (bytes 0-1 of single and family records) ---

pub const TYPE_TAG_SINGLE: u16 = 0x0001;
pub const TYPE_TAG_FAMILY_PARENT: u16 = 0x0002;
pub const TYPE_TAG_FAMILY_DELTA: u16 = 0x0003;

// --- Schema versions ---

/// Schema version written by default.
pub const CURRENT_SCHEMA_VERSION: u16 = 1;

/// Every schema version a decoder accepts.
pub const SUPPORTED_SCHEMA_VERSIONS: &[u16] = &[1];

// --- Flags word ---

/// Bits 0-2 of the flags word hold the risk ordinal.
pub const RISK_ORDINAL_MASK: u32 = 0b111;

/// Bits 3-31 of the flags word hold capability flags.
pub const CAPABILITY_MASK: u32 = !RISK_ORDINAL_MASK;

/// Core capability flags, word bits 3-15. Only these fit a delta record.
pub const CORE_CAPABILITY_MASK: u32 = 0x0000_FFF8;

/// Domain-extension capability flags, word bits 16-28.
pub const EXTENSION_CAPABILITY_MASK: u32 = 0x1FFF_0000;

// --- Log-scale classes ---

/// Highest legal log-scale performance class.
pub const MAX_LOG_CLASS: u8 = 15;

/// Unit of the exec-time class, in milliseconds.
pub const EXEC_TIME_UNIT_MS: u64 = 100;

/// Unit of the memory class, in megabytes.
pub const MEMORY_UNIT_MB: u64 = 10;

/// Unit of the output-size class, in kilobytes.
pub const OUTPUT_SIZE_UNIT_KB: u64 = 1;

// --- Aggregation ---

/// Largest value `risk_delta` can hold (3 bits).
pub const MAX_RISK_DELTA: u8 = 0b111;

/// The child-count byte of a family record bounds the family size.
pub const MAX_FAMILY_MEMBERS: usize = u8::MAX as usize;
