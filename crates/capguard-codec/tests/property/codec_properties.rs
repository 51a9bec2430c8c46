use capguard_codec::{decode, encode};
use capguard_core::classification::ClassificationInput;
use capguard_core::constants::CAPABILITY_MASK;
use capguard_core::errors::CodecError;
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

// ── Round-trip ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn decode_of_encode_is_identity(input in arb_input(), name in "[a-z][a-z0-9 -]{0,24}") {
        let bytes = encode(&name, &input).unwrap();
        let decoded = decode(&bytes).unwrap();
        prop_assert_eq!(decoded.classification().to_input(), input);
        prop_assert_eq!(usize::from(decoded.name_len), name.len());
    }

    #[test]
    fn ordinals_above_four_never_encode(ordinal in 5u8..=u8::MAX, flags in any::<u32>()) {
        let input = ClassificationInput {
            risk_ordinal: ordinal,
            capability_flags: flags & CAPABILITY_MASK,
            ..ClassificationInput::default()
        };
        prop_assert_eq!(
            encode("x", &input).unwrap_err(),
            CodecError::InvalidRiskOrdinal { ordinal }
        );
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..40)) {
        let _ = decode(&bytes);
    }

    #[test]
    fn any_two_bit_flip_is_detected(
        input in arb_input(),
        first in 0usize..192,
        second in 0usize..192,
    ) {
        prop_assume!(first != second);
        let mut bytes = encode("cmd", &input).unwrap();
        bytes[first / 8] ^= 1 << (first % 8);
        bytes[second / 8] ^= 1 << (second % 8);
        let is_checksum_mismatch = matches!(
            decode(&bytes),
            Err(CodecError::ChecksumMismatch { .. })
        );
        prop_assert!(is_checksum_mismatch);
    }
}

// ── Checksum sensitivity: exhaustive single-bit flips ────────────────────

#[test]
fn every_single_bit_flip_is_a_checksum_mismatch() {
    let samples = test_fixtures::sample_inputs(128);
    let mut flips = 0usize;
    let mut false_accepts = 0usize;

    for (i, input) in samples.iter().enumerate() {
        let name = format!("cmd-{i}");
        let record = encode(&name, input).unwrap();
        for bit in 0..record.len() * 8 {
            let mut corrupted = record;
            corrupted[bit / 8] ^= 1 << (bit % 8);
            flips += 1;
            match decode(&corrupted) {
                Err(CodecError::ChecksumMismatch { .. }) => {}
                Ok(_) => false_accepts += 1,
                Err(other) => panic!("sample {i} bit {bit}: expected checksum mismatch, got {other:?}"),
            }
        }
    }

    assert_eq!(flips, 128 * 24 * 8);
    assert_eq!(false_accepts, 0, "{false_accepts} corrupted records were accepted");
}
