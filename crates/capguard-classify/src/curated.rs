//! Human-curated classification table, loaded from TOML.
//!
//! ```toml
//! [[commands]]
//! name = "curl"
//! risk = "moderate"
//! capabilities = ["NETWORK_ACCESS"]
//! exec_time_class = 3
//! ```

use std::collections::HashMap;
use std::path::Path;

use capguard_core::classification::{CapabilityFlags, ClassificationInput, RiskLevel};
use capguard_core::errors::ClassifierError;
use capguard_core::traits::IClassifier;
use serde::Deserialize;
use tracing::{debug, info};

use crate::normalize_command;

#[derive(Debug, Deserialize)]
struct CuratedTable {
    #[serde(default)]
    commands: Vec<CuratedEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CuratedEntry {
    name: String,
    risk: RiskLevel,
    #[serde(default)]
    capabilities: Vec<String>,
    #[serde(default)]
    exec_time_class: u8,
    #[serde(default)]
    memory_class: u8,
    #[serde(default)]
    output_size_class: u8,
}

/// Exact-match lookup table. Every entry is validated when the table loads.
#[derive(Debug, Clone, Default)]
pub struct CuratedClassifier {
    source_name: String,
    entries: HashMap<String, ClassificationInput>,
}

impl CuratedClassifier {
    pub fn from_toml(source_name: impl Into<String>, text: &str) -> Result<Self, ClassifierError> {
        let source_name = source_name.into();
        let load_error = |reason: String| ClassifierError::TableLoad {
            source_name: source_name.clone(),
            reason,
        };

        let table: CuratedTable = toml::from_str(text).map_err(|e| load_error(e.to_string()))?;
        let mut entries = HashMap::with_capacity(table.commands.len());
        for entry in table.commands {
            let name = normalize_command(&entry.name);
            if name.is_empty() {
                return Err(load_error("entry with an empty name".to_string()));
            }
            let input =
                entry_input(&entry).map_err(|reason| load_error(format!("{name}: {reason}")))?;
            if entries.insert(name.clone(), input).is_some() {
                return Err(load_error(format!("{name}: duplicate entry")));
            }
        }

        info!(source = %source_name, commands = entries.len(), "curated table loaded");
        Ok(Self {
            source_name,
            entries,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ClassifierError::TableLoad {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(path.display().to_string(), &text)
    }

    /// Add or replace one entry. The input must already be structurally valid.
    pub fn insert(
        &mut self,
        name: &str,
        input: ClassificationInput,
    ) -> Result<(), ClassifierError> {
        input.validate().map_err(|e| ClassifierError::TableLoad {
            source_name: self.source_name.clone(),
            reason: format!("{name}: {e}"),
        })?;
        self.entries.insert(normalize_command(name), input);
        Ok(())
    }

    pub fn contains(&self, command: &str) -> bool {
        self.entries.contains_key(&normalize_command(command))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Curated command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn entry_input(entry: &CuratedEntry) -> Result<ClassificationInput, String> {
    let mut capabilities = CapabilityFlags::empty();
    for flag in &entry.capabilities {
        let bit = CapabilityFlags::from_name(flag)
            .ok_or_else(|| format!("unknown capability flag {flag}"))?;
        capabilities = capabilities | bit;
    }
    let input = ClassificationInput {
        risk_ordinal: entry.risk.ordinal(),
        capability_flags: capabilities.bits(),
        exec_time_class: entry.exec_time_class,
        memory_class: entry.memory_class,
        output_size_class: entry.output_size_class,
    };
    input.validate().map_err(|e| e.to_string())?;
    Ok(input)
}

impl IClassifier for CuratedClassifier {
    fn classify(&self, command: &str) -> Result<ClassificationInput, ClassifierError> {
        let name = normalize_command(command);
        match self.entries.get(&name) {
            Some(input) => {
                debug!(command = %name, source = %self.source_name, "curated hit");
                Ok(*input)
            }
            None => Err(ClassifierError::UnknownCommand { name }),
        }
    }

    fn source_name(&self) -> &str {
        "curated"
    }
}
