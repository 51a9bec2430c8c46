//! Splits a family into delta members and overflowed children.

use std::collections::HashSet;

use capguard_codec::metadata::DeltaMetadata;
use capguard_codec::subcommand_hash;
use capguard_core::classification::{CapabilityFlags, Classification, LogClass, RiskLevel};
use capguard_core::config::AggregationConfig;
use capguard_core::constants::{CORE_CAPABILITY_MASK, MAX_FAMILY_MEMBERS, MAX_RISK_DELTA};
use capguard_core::errors::{AggregationError, CodecResult};
use capguard_core::models::{FamilyInput, OverflowReason};

use crate::records::delta::DeltaFields;

/// A child that fits a delta record.
#[derive(Debug, Clone, Copy)]
pub struct PlannedDelta {
    /// Index into `FamilyInput::children`.
    pub child: usize,
    pub fields: DeltaFields,
}

/// A child that must be encoded standalone.
#[derive(Debug, Clone, Copy)]
pub struct PlannedOverflow {
    pub child: usize,
    pub reason: OverflowReason,
}

/// Everything the aggregator decided about a family, before any bytes exist.
#[derive(Debug, Clone)]
pub struct FamilyPlan {
    /// Bits set in every child, over all N children.
    pub common_flags: CapabilityFlags,
    /// Lowest risk over all N children.
    pub risk_floor: RiskLevel,
    /// Validated classification of every child, index-aligned with the input.
    pub classifications: Vec<Classification>,
    pub deltas: Vec<PlannedDelta>,
    pub overflowed: Vec<PlannedOverflow>,
}

impl FamilyPlan {
    /// Validate every child and compute the shared parent fields and deltas.
    ///
    /// Any invalid child fails the whole family; nothing is coerced.
    pub fn build(input: &FamilyInput, config: &AggregationConfig) -> Result<Self, AggregationError> {
        let members = input.children.len();
        if members == 0 {
            return Err(AggregationError::EmptyFamily {
                family: input.name.clone(),
            });
        }
        let max = config.max_family_size.min(MAX_FAMILY_MEMBERS);
        if members > max {
            return Err(AggregationError::FamilyTooLarge {
                family: input.name.clone(),
                members,
                max,
            });
        }

        let classifications = input
            .children
            .iter()
            .map(|child| child.classification.validate())
            .collect::<CodecResult<Vec<_>>>()?;

        let common_flags = classifications
            .iter()
            .map(|c| c.capabilities)
            .reduce(CapabilityFlags::intersection)
            .unwrap_or_default();
        let risk_floor = classifications
            .iter()
            .map(|c| c.risk)
            .min()
            .unwrap_or_default();

        let mut deltas = Vec::with_capacity(members);
        let mut overflowed = Vec::new();
        let mut used_hashes = HashSet::with_capacity(members);

        for (child, (command, classification)) in
            input.children.iter().zip(&classifications).enumerate()
        {
            let delta_flags = classification.capabilities.difference(common_flags);
            let risk_delta = classification.risk.ordinal() - risk_floor.ordinal();
            let hash = subcommand_hash(&command.name);

            let reason = if risk_delta > MAX_RISK_DELTA {
                Some(OverflowReason::RiskDelta { risk_delta })
            } else if !delta_flags.is_core_only() {
                Some(OverflowReason::DeltaFlags {
                    bits: delta_flags.bits() & !CORE_CAPABILITY_MASK,
                })
            } else if !config.emit_output_class_metadata
                && classification.output_size_class != LogClass::MIN
            {
                Some(OverflowReason::OutputClass {
                    class: classification.output_size_class.value(),
                })
            } else if used_hashes.contains(&hash) {
                Some(OverflowReason::SubcommandHashCollision { hash })
            } else {
                None
            };

            match reason {
                Some(reason) => overflowed.push(PlannedOverflow { child, reason }),
                None => {
                    used_hashes.insert(hash);
                    deltas.push(PlannedDelta {
                        child,
                        fields: DeltaFields {
                            subcommand_hash: hash,
                            risk_delta,
                            delta_flags,
                            exec_time_class: classification.exec_time_class,
                            memory_class: classification.memory_class,
                            metadata: DeltaMetadata::for_output_class(
                                classification.output_size_class,
                            ),
                        },
                    });
                }
            }
        }

        Ok(Self {
            common_flags,
            risk_floor,
            classifications,
            deltas,
            overflowed,
        })
    }

    /// Whether enough children fit as deltas to justify a parent record.
    pub fn is_beneficial(&self, min_family_size: usize) -> bool {
        self.deltas.len() >= min_family_size
    }
}
