// Single source of truth for all default values.

// --- Codec ---
pub const DEFAULT_SCHEMA_VERSION: u16 = crate::constants::CURRENT_SCHEMA_VERSION;

// --- Aggregation ---
pub const DEFAULT_MIN_FAMILY_SIZE: usize = 2;
pub const DEFAULT_MAX_FAMILY_SIZE: usize = crate::constants::MAX_FAMILY_MEMBERS;
pub const DEFAULT_EMIT_OUTPUT_CLASS_METADATA: bool = true;

// --- Registry ---
pub const DEFAULT_REGISTRY_INITIAL_CAPACITY: usize = 256;
pub const DEFAULT_REGISTRY_SHARD_AMOUNT: usize = 16;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
