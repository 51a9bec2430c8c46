use capguard_codec::{decode, encode};
use capguard_compression::{decode_family, FamilyAggregator};
use capguard_core::classification::{CapabilityFlags, ClassificationInput, ClassifiedCommand};
use capguard_core::constants::CAPABILITY_MASK;
use capguard_core::models::{AggregationOutcome, FamilyInput, FamilyKind};
use capguard_core::traits::IAggregator;
use proptest::prelude::*;

fn arb_input() -> impl Strategy<Value = ClassificationInput> {
    (0u8..=4, any::<u32>(), 0u8..=15, 0u8..=15, 0u8..=15).prop_map(
        |(risk_ordinal, flags, exec_time_class, memory_class, output_size_class)| {
            ClassificationInput {
                risk_ordinal,
                capability_flags: flags & CAPABILITY_MASK,
                exec_time_class,
                memory_class,
                output_size_class,
            }
        },
    )
}

fn family(inputs: Vec<ClassificationInput>) -> FamilyInput {
    FamilyInput {
        name: "tool".to_string(),
        kind: FamilyKind::Generic,
        children: inputs
            .into_iter()
            .enumerate()
            .map(|(i, input)| ClassifiedCommand::new(format!("sub{i}"), input))
            .collect(),
    }
}

/// What encoding `input` standalone and decoding it yields.
fn standalone_view(name: &str, input: &ClassificationInput) -> ClassificationInput {
    decode(&encode(name, input).unwrap())
        .unwrap()
        .classification()
        .to_input()
}

// ── Hierarchical equivalence ─────────────────────────────────────────────

proptest! {
    #[test]
    fn family_children_decode_like_standalone(
        inputs in proptest::collection::vec(arb_input(), 1..24)
    ) {
        let input = family(inputs);
        let outcome = FamilyAggregator::new().aggregate_family(&input).unwrap();

        match outcome {
            AggregationOutcome::Family(encoding) => {
                let children = decode_family(&encoding.family_bytes, &encoding.delta_slices()).unwrap();
                prop_assert_eq!(children.len(), encoding.member_names.len());
                for (decoded, name) in children.iter().zip(&encoding.member_names) {
                    let original = input.children.iter().find(|c| &c.name == name).unwrap();
                    prop_assert_eq!(
                        decoded.classification().to_input(),
                        standalone_view(name, &original.classification)
                    );
                }
                prop_assert_eq!(
                    children.len() + encoding.standalone.len(),
                    input.children.len()
                );
                for record in &encoding.standalone {
                    let sub = record.name.trim_start_matches("tool ");
                    let original = input.children.iter().find(|c| c.name == sub).unwrap();
                    prop_assert_eq!(
                        decode(&record.bytes).unwrap().classification().to_input(),
                        original.classification
                    );
                }
            }
            AggregationOutcome::NotBeneficial { singles, .. } => {
                prop_assert_eq!(singles.len(), input.children.len());
                for (record, original) in singles.iter().zip(&input.children) {
                    prop_assert_eq!(
                        decode(&record.bytes).unwrap().classification().to_input(),
                        original.classification
                    );
                }
            }
        }
    }

    #[test]
    fn parent_fields_hold_for_every_child(
        inputs in proptest::collection::vec(arb_input(), 2..16)
    ) {
        let input = family(inputs);
        if let AggregationOutcome::Family(encoding) =
            FamilyAggregator::new().aggregate_family(&input).unwrap()
        {
            for child in &input.children {
                let flags = CapabilityFlags::from_bits(child.classification.capability_flags).unwrap();
                prop_assert!(flags.contains(encoding.family.common_flags));
                prop_assert!(child.classification.risk_ordinal >= encoding.family.risk_floor.ordinal());
            }
        }
    }
}

// ── Compression monotonicity ─────────────────────────────────────────────

proptest! {
    #[test]
    fn siblings_sharing_a_flag_never_grow(
        inputs in proptest::collection::vec(arb_input(), 2..32),
        shared_bit in 3u32..16,
    ) {
        let shared = 1u32 << shared_bit;
        let inputs: Vec<_> = inputs
            .into_iter()
            .map(|mut i| {
                i.capability_flags |= shared;
                i
            })
            .collect();
        let n = inputs.len();
        let outcome = FamilyAggregator::new().aggregate_family(&family(inputs)).unwrap();
        let report = outcome.report();

        prop_assert_eq!(report.original_total_bytes, n * 24);
        prop_assert!(report.compressed_total_bytes <= n * 24);
        if let AggregationOutcome::Family(encoding) = &outcome {
            prop_assert!(encoding.family.common_flags.bits() & shared != 0);
        }
    }

    #[test]
    fn single_member_is_never_aggregated(input in arb_input()) {
        let outcome = FamilyAggregator::new().aggregate_family(&family(vec![input])).unwrap();
        prop_assert!(!outcome.is_family());
        prop_assert_eq!(outcome.report().ratio, 1.0);
    }

    #[test]
    fn arbitrary_family_bytes_never_panic(
        parent in proptest::collection::vec(any::<u8>(), 0..20),
        deltas in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..10), 0..4),
    ) {
        let slices: Vec<&[u8]> = deltas.iter().map(Vec::as_slice).collect();
        let _ = decode_family(&parent, &slices);
    }
}
