use serde::{Deserialize, Serialize};

use super::{CapabilityFlags, LogClass, RiskLevel};
use crate::errors::CodecResult;

/// Raw classifier output, exactly as an external classifier produced it.
///
/// Nothing here is trusted until [`ClassificationInput::validate`] succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ClassificationInput {
    pub risk_ordinal: u8,
    /// Word-aligned capability bits (bits 3-31 of the flags word).
    pub capability_flags: u32,
    pub exec_time_class: u8,
    pub memory_class: u8,
    pub output_size_class: u8,
}

impl ClassificationInput {
    /// Check every range the descriptor format enforces.
    pub fn validate(&self) -> CodecResult<Classification> {
        Ok(Classification {
            risk: RiskLevel::from_ordinal(self.risk_ordinal)?,
            capabilities: CapabilityFlags::from_bits(self.capability_flags)?,
            exec_time_class: LogClass::new("exec_time", u16::from(self.exec_time_class))?,
            memory_class: LogClass::new("memory", u16::from(self.memory_class))?,
            output_size_class: LogClass::new("output_size", u16::from(self.output_size_class))?,
        })
    }
}

/// A classification that passed structural validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Classification {
    pub risk: RiskLevel,
    pub capabilities: CapabilityFlags,
    pub exec_time_class: LogClass,
    pub memory_class: LogClass,
    pub output_size_class: LogClass,
}

impl Classification {
    pub fn new(risk: RiskLevel, capabilities: CapabilityFlags) -> Self {
        Self {
            risk,
            capabilities,
            ..Self::default()
        }
    }

    pub fn with_performance(
        mut self,
        exec_time_class: LogClass,
        memory_class: LogClass,
        output_size_class: LogClass,
    ) -> Self {
        self.exec_time_class = exec_time_class;
        self.memory_class = memory_class;
        self.output_size_class = output_size_class;
        self
    }

    /// Back to the raw form. `validate` of the result always succeeds.
    pub fn to_input(self) -> ClassificationInput {
        ClassificationInput {
            risk_ordinal: self.risk.ordinal(),
            capability_flags: self.capabilities.bits(),
            exec_time_class: self.exec_time_class.value(),
            memory_class: self.memory_class.value(),
            output_size_class: self.output_size_class.value(),
        }
    }
}

impl From<Classification> for ClassificationInput {
    fn from(classification: Classification) -> Self {
        classification.to_input()
    }
}

/// A command name paired with its classifier output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedCommand {
    pub name: String,
    pub classification: ClassificationInput,
}

impl ClassifiedCommand {
    pub fn new(name: impl Into<String>, classification: impl Into<ClassificationInput>) -> Self {
        Self {
            name: name.into(),
            classification: classification.into(),
        }
    }
}
