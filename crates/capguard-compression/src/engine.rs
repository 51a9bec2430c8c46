//! FamilyAggregator: implements IAggregator, plus batch aggregation.

use capguard_codec::{name_hash, single};
use capguard_core::classification::{Classification, ClassificationInput};
use capguard_core::config::{AggregationConfig, CapguardConfig};
use capguard_core::constants::{CURRENT_SCHEMA_VERSION, FAMILY_RECORD_LEN, SINGLE_RECORD_LEN};
use capguard_core::errors::{AggregationError, CodecError, CodecResult, ErrorCode};
use capguard_core::models::{
    AggregationOutcome, CompressionReport, DeltaDescriptor, FamilyDescriptor, FamilyEncoding,
    FamilyInput, OverflowedChild, RecordKind, StandaloneDescriptor, ToolDescriptor,
};
use capguard_core::traits::IAggregator;
use capguard_observability::{aggregation_span, decode_family_span};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::partition::FamilyPlan;
use crate::records::family::FamilyHeader;
use crate::records::{delta, family};

/// Hierarchical aggregation engine.
///
/// Stateless apart from its configuration, so one instance can be shared
/// across threads and batches.
#[derive(Debug, Clone)]
pub struct FamilyAggregator {
    config: AggregationConfig,
    schema_version: u16,
}

impl FamilyAggregator {
    /// Create an aggregator with the default configuration.
    pub fn new() -> Self {
        Self::with_config(AggregationConfig::default())
    }

    pub fn with_config(config: AggregationConfig) -> Self {
        Self {
            config,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Build from a validated top-level config.
    pub fn from_config(config: &CapguardConfig) -> Self {
        Self {
            config: config.aggregation.clone(),
            schema_version: config.codec.schema_version,
        }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Aggregate many independent families in parallel. Results keep the
    /// input order; one failing family does not affect the others.
    pub fn aggregate_families(
        &self,
        inputs: &[FamilyInput],
    ) -> Vec<Result<AggregationOutcome, AggregationError>> {
        inputs
            .par_iter()
            .map(|input| self.aggregate_family(input))
            .collect()
    }

    fn standalone(
        &self,
        input: &FamilyInput,
        child: usize,
        classification: &Classification,
    ) -> StandaloneDescriptor {
        let name = input.qualified_name(&input.children[child].name);
        let name_len = u16::try_from(name.len()).unwrap_or(u16::MAX);
        let bytes = single::write_record(
            name_hash(&name),
            name_len,
            classification,
            self.schema_version,
        );
        StandaloneDescriptor { name, bytes }
    }

    fn not_beneficial(&self, input: &FamilyInput, plan: &FamilyPlan) -> AggregationOutcome {
        let singles: Vec<StandaloneDescriptor> = plan
            .classifications
            .iter()
            .enumerate()
            .map(|(child, classification)| self.standalone(input, child, classification))
            .collect();
        let original = singles.len() * SINGLE_RECORD_LEN;

        debug!(
            family = %input.name,
            members = singles.len(),
            deltas = plan.deltas.len(),
            "aggregation not beneficial, encoding members standalone"
        );
        AggregationOutcome::NotBeneficial {
            singles,
            report: CompressionReport::new(original, original, Vec::new()),
        }
    }
}

impl Default for FamilyAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl IAggregator for FamilyAggregator {
    fn aggregate_family(
        &self,
        input: &FamilyInput,
    ) -> Result<AggregationOutcome, AggregationError> {
        let _span = aggregation_span!(input.name, input.children.len()).entered();
        let plan = FamilyPlan::build(input, &self.config)?;
        if !plan.is_beneficial(self.config.min_family_size) {
            return Ok(self.not_beneficial(input, &plan));
        }

        let members = input.children.len();
        let child_count =
            u8::try_from(plan.deltas.len()).map_err(|_| AggregationError::FamilyTooLarge {
                family: input.name.clone(),
                members,
                max: usize::from(u8::MAX),
            })?;

        let family_bytes = family::encode(&FamilyHeader {
            schema_version: self.schema_version,
            family_hash: name_hash(&input.name),
            common_flags: plan.common_flags,
            risk_floor: plan.risk_floor,
            child_count,
            kind: input.kind,
        });
        let family = family::decode(&family_bytes)?;

        let mut member_names = Vec::with_capacity(plan.deltas.len());
        let mut deltas = Vec::with_capacity(plan.deltas.len());
        let mut delta_bytes = Vec::with_capacity(plan.deltas.len());
        for planned in &plan.deltas {
            let encoded = delta::encode(&planned.fields)?;
            deltas.push(delta::decode(encoded.as_bytes())?);
            delta_bytes.push(encoded);
            member_names.push(input.children[planned.child].name.clone());
        }

        let mut standalone = Vec::with_capacity(plan.overflowed.len());
        let mut overflowed_children = Vec::with_capacity(plan.overflowed.len());
        for overflow in &plan.overflowed {
            let classification = &plan.classifications[overflow.child];
            let record = self.standalone(input, overflow.child, classification);
            let overflowed = OverflowedChild {
                name: record.name.clone(),
                reason: overflow.reason,
            };
            warn!(
                family = %input.name,
                child = %record.name,
                reason = %overflow.reason,
                code = overflowed.to_error().error_code(),
                "child encoded standalone"
            );
            overflowed_children.push(overflowed);
            standalone.push(record);
        }

        let original = members * SINGLE_RECORD_LEN;
        let compressed = FAMILY_RECORD_LEN
            + delta_bytes.iter().map(|d| d.len()).sum::<usize>()
            + standalone.len() * SINGLE_RECORD_LEN;
        let report = CompressionReport::new(original, compressed, overflowed_children);

        info!(
            family = %input.name,
            kind = %input.kind,
            members,
            deltas = deltas.len(),
            overflowed = standalone.len(),
            original,
            compressed,
            ratio = report.ratio,
            "family aggregated"
        );

        Ok(AggregationOutcome::Family(FamilyEncoding {
            name: input.name.clone(),
            family,
            family_bytes,
            member_names,
            deltas,
            delta_bytes,
            standalone,
            report,
        }))
    }

    fn decode_family(
        &self,
        family_bytes: &[u8],
        delta_bytes: &[&[u8]],
    ) -> Result<Vec<ToolDescriptor>, AggregationError> {
        decode_family(family_bytes, delta_bytes)
    }
}

/// Parent, deltas and reconstructed children, all taken from verified bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFamily {
    pub family: FamilyDescriptor,
    pub deltas: Vec<DeltaDescriptor>,
    /// Index-aligned with `deltas`.
    pub children: Vec<ToolDescriptor>,
}

/// Reconstruct every child of a family, or fail without returning any.
///
/// Parent length, tag, kind and version problems keep their codec error.
/// A bad checksum anywhere, a delta count that disagrees with the parent, or
/// a child that does not re-validate is a [`AggregationError::FamilyIntegrityError`].
pub fn decode_family(
    family_bytes: &[u8],
    delta_bytes: &[&[u8]],
) -> Result<Vec<ToolDescriptor>, AggregationError> {
    decode_family_records(family_bytes, delta_bytes).map(|decoded| decoded.children)
}

/// [`decode_family`], keeping the decoded parent and delta records as well.
pub fn decode_family_records(
    family_bytes: &[u8],
    delta_bytes: &[&[u8]],
) -> Result<DecodedFamily, AggregationError> {
    let _span = decode_family_span!(delta_bytes.len()).entered();
    let parent = family::decode(family_bytes).map_err(|e| match e {
        CodecError::ChecksumMismatch { .. } => {
            AggregationError::integrity(format!("family record: {e}"))
        }
        other => AggregationError::Codec(other),
    })?;

    if delta_bytes.len() != usize::from(parent.child_count) {
        return Err(AggregationError::integrity(format!(
            "family declares {} children, {} delta records given",
            parent.child_count,
            delta_bytes.len()
        )));
    }

    let mut deltas = Vec::with_capacity(delta_bytes.len());
    let mut children = Vec::with_capacity(delta_bytes.len());
    for (i, bytes) in delta_bytes.iter().enumerate() {
        let decoded = delta::decode(bytes)
            .and_then(|d| reconstruct(&parent, &d).map(|child| (d, child)));
        match decoded {
            Ok((delta, child)) => {
                deltas.push(delta);
                children.push(child);
            }
            Err(e) => {
                let err = AggregationError::integrity(format!("delta {i}: {e}"));
                debug!(family_hash = parent.family_hash, error = %err, "family rejected");
                return Err(err);
            }
        }
    }

    debug!(
        family_hash = parent.family_hash,
        children = children.len(),
        "family decoded"
    );
    Ok(DecodedFamily {
        family: parent,
        deltas,
        children,
    })
}

/// One child as `common | delta` and `floor + delta`, validated as if it had
/// just come from a classifier.
pub fn reconstruct(
    family: &FamilyDescriptor,
    delta: &DeltaDescriptor,
) -> CodecResult<ToolDescriptor> {
    let input = ClassificationInput {
        risk_ordinal: family.risk_floor.ordinal() + delta.risk_delta,
        capability_flags: family.common_flags.union(delta.delta_flags).bits(),
        exec_time_class: delta.exec_time_class.value(),
        memory_class: delta.memory_class.value(),
        output_size_class: delta.output_size_class.unwrap_or_default().value(),
    };
    let classification = input.validate()?;

    Ok(ToolDescriptor {
        kind: RecordKind::FamilyDelta,
        schema_version: family.schema_version,
        name_hash: u32::from(delta.subcommand_hash),
        risk: classification.risk,
        capabilities: classification.capabilities,
        exec_time_class: classification.exec_time_class,
        memory_class: classification.memory_class,
        output_size_class: classification.output_size_class,
        name_len: 0,
    })
}
