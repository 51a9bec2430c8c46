//! Test fixture loader for capguard golden scenarios.
//!
//! Provides typed deserialization of the fixture JSON files and helpers for
//! loading them in tests across crates.

use capguard_core::classification::{CapabilityFlags, ClassificationInput, RiskLevel};
use capguard_core::constants::CAPABILITY_MASK;
use capguard_core::models::FamilyInput;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

/// Root directory of the test-fixtures crate.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up until a sibling
    // test-fixtures directory with golden data shows up.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    loop {
        if path.join("golden").is_dir() && path.ends_with("test-fixtures") {
            return path;
        }
        let candidate = path.join("test-fixtures");
        if candidate.join("golden").is_dir() {
            return candidate;
        }
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// List all files with `extension` in a fixture subdirectory, sorted.
pub fn list_fixtures(subdir: &str, extension: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension()
                .is_some_and(|ext| ext == extension)
                .then_some(path)
        })
        .collect();
    files.sort();
    files
}

// ── Typed scenarios ──────────────────────────────────────────────────────

/// Flags given by name in fixture files.
fn flags_from_names(names: &[String]) -> CapabilityFlags {
    names
        .iter()
        .map(|name| {
            CapabilityFlags::from_name(name)
                .unwrap_or_else(|| panic!("Unknown capability flag in fixture: {name}"))
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedDescriptor {
    pub risk: RiskLevel,
    pub capabilities: Vec<String>,
}

impl ExpectedDescriptor {
    pub fn flags(&self) -> CapabilityFlags {
        flags_from_names(&self.capabilities)
    }
}

/// One command encoded as a standalone record.
#[derive(Debug, Clone, Deserialize)]
pub struct SingleScenario {
    pub description: String,
    pub command: String,
    pub input: ClassificationInput,
    pub expected: ExpectedDescriptor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedDelta {
    pub subcommand: String,
    pub risk_delta: u8,
    pub delta_flags: Vec<String>,
}

impl ExpectedDelta {
    pub fn flags(&self) -> CapabilityFlags {
        flags_from_names(&self.delta_flags)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedFamily {
    pub common_flags: Vec<String>,
    pub risk_floor: RiskLevel,
    pub deltas: Vec<ExpectedDelta>,
    pub original_total_bytes: usize,
    pub max_compressed_total_bytes: usize,
}

impl ExpectedFamily {
    pub fn common(&self) -> CapabilityFlags {
        flags_from_names(&self.common_flags)
    }
}

/// A family aggregated into one parent and N deltas.
#[derive(Debug, Clone, Deserialize)]
pub struct FamilyScenario {
    pub description: String,
    pub family: FamilyInput,
    pub expected: ExpectedFamily,
}

/// A buffer that must be rejected before any field is read.
#[derive(Debug, Clone, Deserialize)]
pub struct MalformedScenario {
    pub description: String,
    pub length: usize,
    pub expected_error: String,
}

pub fn single_scenario(name: &str) -> SingleScenario {
    load_fixture(&format!("golden/single/{name}.json"))
}

pub fn family_scenario(name: &str) -> FamilyScenario {
    load_fixture(&format!("golden/family/{name}.json"))
}

pub fn malformed_scenario(name: &str) -> MalformedScenario {
    load_fixture(&format!("golden/malformed/{name}.json"))
}

/// Deterministic spread of valid classifier outputs covering every risk
/// ordinal, every class value, and both core and extension flag bits.
pub fn sample_inputs(count: usize) -> Vec<ClassificationInput> {
    (0..count)
        .map(|i| {
            let seed = (i as u32).wrapping_add(1).wrapping_mul(0x9E37_79B9);
            ClassificationInput {
                risk_ordinal: (i % 5) as u8,
                capability_flags: seed.rotate_left((i % 29) as u32) & CAPABILITY_MASK,
                exec_time_class: (i % 16) as u8,
                memory_class: ((i / 3) % 16) as u8,
                output_size_class: ((i / 7) % 16) as u8,
            }
        })
        .collect()
}
