use capguard_codec::integrity;
use capguard_codec::metadata::DeltaMetadata;
use capguard_codec::{decode, subcommand_hash};
use capguard_compression::records::delta::{self, DeltaFields};
use capguard_compression::records::family::{self, FamilyHeader};
use capguard_compression::{decode_family, decode_family_records, FamilyAggregator};
use capguard_core::classification::{
    CapabilityFlags, Classification, ClassificationInput, ClassifiedCommand, LogClass, RiskLevel,
};
use capguard_core::config::AggregationConfig;
use capguard_core::errors::{AggregationError, CodecError, ErrorCode};
use capguard_core::models::{
    AggregationOutcome, FamilyEncoding, FamilyInput, FamilyKind, OverflowReason, RecordKind,
};
use capguard_core::traits::IAggregator;

fn child(name: &str, risk: RiskLevel, flags: CapabilityFlags) -> ClassifiedCommand {
    ClassifiedCommand::new(name, Classification::new(risk, flags))
}

fn family_of(name: &str, children: Vec<ClassifiedCommand>) -> FamilyInput {
    FamilyInput {
        name: name.to_string(),
        kind: FamilyKind::Generic,
        children,
    }
}

fn expect_family(outcome: AggregationOutcome) -> FamilyEncoding {
    match outcome {
        AggregationOutcome::Family(encoding) => encoding,
        AggregationOutcome::NotBeneficial { .. } => panic!("expected a family encoding"),
    }
}

fn git_encoding() -> FamilyEncoding {
    let scenario = test_fixtures::family_scenario("git");
    expect_family(FamilyAggregator::new().aggregate_family(&scenario.family).unwrap())
}

// ── Scenario C: git family ───────────────────────────────────────────────

#[test]
fn scenario_c_git_family_parent_fields() {
    let scenario = test_fixtures::family_scenario("git");
    let encoding = git_encoding();

    assert_eq!(encoding.family.common_flags, scenario.expected.common());
    assert_eq!(encoding.family.risk_floor, scenario.expected.risk_floor);
    assert_eq!(encoding.family.child_count, 3);
    assert_eq!(encoding.family.kind, FamilyKind::VersionControl);
    assert_eq!(encoding.family_bytes.len(), 16);
}

#[test]
fn scenario_c_git_family_deltas() {
    let scenario = test_fixtures::family_scenario("git");
    let encoding = git_encoding();

    assert_eq!(encoding.deltas.len(), scenario.expected.deltas.len());
    for ((delta, name), expected) in encoding
        .deltas
        .iter()
        .zip(&encoding.member_names)
        .zip(&scenario.expected.deltas)
    {
        assert_eq!(name, &expected.subcommand);
        assert_eq!(delta.risk_delta, expected.risk_delta, "{name}");
        assert_eq!(delta.delta_flags, expected.flags(), "{name}");
        assert_eq!(delta.subcommand_hash, subcommand_hash(name));
    }
}

#[test]
fn scenario_c_git_family_compresses_below_standalone_size() {
    let scenario = test_fixtures::family_scenario("git");
    let report = git_encoding().report;

    assert_eq!(report.original_total_bytes, scenario.expected.original_total_bytes);
    assert!(report.compressed_total_bytes <= scenario.expected.max_compressed_total_bytes);
    assert!(report.compressed_total_bytes < report.original_total_bytes);
    // No output classes, so every delta is the 6-byte base record.
    assert_eq!(report.compressed_total_bytes, 16 + 3 * 6);
    assert!(report.ratio > 2.0);
    assert!(report.overflowed_children.is_empty());
    assert_eq!(report.bytes_saved(), 72 - 34);
}

#[test]
fn scenario_c_decodes_to_the_original_classifications() {
    let scenario = test_fixtures::family_scenario("git");
    let encoding = git_encoding();

    let children = decode_family(&encoding.family_bytes, &encoding.delta_slices()).unwrap();
    assert_eq!(children.len(), 3);
    for (decoded, input) in children.iter().zip(&scenario.family.children) {
        assert_eq!(decoded.kind, RecordKind::FamilyDelta);
        assert_eq!(decoded.name_hash, u32::from(subcommand_hash(&input.name)));
        assert_eq!(decoded.name_len, 0);
        assert_eq!(decoded.classification().to_input(), input.classification);
    }
}

#[test]
fn family_children_match_standalone_encoding() {
    let scenario = test_fixtures::family_scenario("git");
    let encoding = git_encoding();
    let children = decode_family(&encoding.family_bytes, &encoding.delta_slices()).unwrap();

    for (decoded, input) in children.iter().zip(&scenario.family.children) {
        let standalone = capguard_codec::encode(&input.name, &input.classification).unwrap();
        let single = decode(&standalone).unwrap();
        assert_eq!(decoded.risk, single.risk);
        assert_eq!(decoded.capabilities, single.capabilities);
        assert_eq!(decoded.classification(), single.classification());
    }
}

// ── Common flags and risk floor ──────────────────────────────────────────

#[test]
fn shared_flags_move_to_the_parent() {
    let net = CapabilityFlags::NETWORK_ACCESS;
    let ext = CapabilityFlags::extension(2).unwrap();
    let input = family_of(
        "aws",
        vec![
            child("s3 ls", RiskLevel::Low, net | ext),
            child("s3 rm", RiskLevel::High, net | ext | CapabilityFlags::FILE_DELETION),
            child(
                "ec2 terminate-instances",
                RiskLevel::Severe,
                net | ext | CapabilityFlags::DESTRUCTIVE,
            ),
        ],
    );
    let encoding = expect_family(FamilyAggregator::new().aggregate_family(&input).unwrap());

    assert_eq!(encoding.family.common_flags, net | ext);
    assert_eq!(encoding.family.risk_floor, RiskLevel::Low);
    assert!(encoding.deltas[0].delta_flags.is_empty());
    assert_eq!(encoding.deltas[1].delta_flags, CapabilityFlags::FILE_DELETION);
    assert_eq!(encoding.deltas[2].risk_delta, 3);
    assert!(encoding.report.overflowed_children.is_empty());

    let children = decode_family(&encoding.family_bytes, &encoding.delta_slices()).unwrap();
    assert!(children.iter().all(|c| c.has(net | ext)));
    assert_eq!(children[2].risk, RiskLevel::Severe);
}

// ── Overflow ─────────────────────────────────────────────────────────────

#[test]
fn child_specific_extension_flag_overflows_to_standalone() {
    let ext = CapabilityFlags::extension(0).unwrap();
    let input = family_of(
        "btrfs",
        vec![
            child("filesystem show", RiskLevel::Benign, CapabilityFlags::empty()),
            child("subvolume list", RiskLevel::Benign, CapabilityFlags::empty()),
            child("device remove", RiskLevel::High, ext | CapabilityFlags::SYSTEM_MODIFICATION),
        ],
    );
    let encoding = expect_family(FamilyAggregator::new().aggregate_family(&input).unwrap());

    assert_eq!(encoding.deltas.len(), 2);
    assert_eq!(encoding.family.child_count, 2);
    assert_eq!(encoding.standalone.len(), 1);
    assert_eq!(encoding.standalone[0].name, "btrfs device remove");

    let overflowed = &encoding.report.overflowed_children[0];
    assert_eq!(overflowed.reason, OverflowReason::DeltaFlags { bits: ext.bits() });
    assert_eq!(overflowed.to_error().error_code(), "ENCODING_OVERFLOW");
    assert_eq!(encoding.report.compressed_total_bytes, 16 + 2 * 6 + 24);

    let single = decode(&encoding.standalone[0].bytes).unwrap();
    assert_eq!(single.risk, RiskLevel::High);
    assert_eq!(single.capabilities, ext | CapabilityFlags::SYSTEM_MODIFICATION);
}

#[test]
fn subcommand_hash_collision_overflows_later_member() {
    // "rm" and "cherry-pick" share an 8-bit subcommand hash.
    assert_eq!(subcommand_hash("rm"), subcommand_hash("cherry-pick"));
    let input = family_of(
        "git",
        vec![
            child("status", RiskLevel::Benign, CapabilityFlags::empty()),
            child("rm", RiskLevel::Moderate, CapabilityFlags::FILE_DELETION),
            child("cherry-pick", RiskLevel::Moderate, CapabilityFlags::FILE_MODIFICATION),
        ],
    );
    let encoding = expect_family(FamilyAggregator::new().aggregate_family(&input).unwrap());

    assert_eq!(encoding.member_names, vec!["status", "rm"]);
    assert_eq!(encoding.standalone[0].name, "git cherry-pick");
    assert_eq!(
        encoding.report.overflowed_children[0].reason,
        OverflowReason::SubcommandHashCollision {
            hash: subcommand_hash("rm")
        }
    );
}

#[test]
fn output_class_rides_in_metadata_segment() {
    let mut loud = Classification::new(RiskLevel::Low, CapabilityFlags::empty());
    loud.output_size_class = LogClass::new("output_size", 6).unwrap();
    let input = family_of(
        "docker",
        vec![
            child("ps", RiskLevel::Benign, CapabilityFlags::empty()),
            ClassifiedCommand::new("logs", loud),
        ],
    );
    let encoding = expect_family(FamilyAggregator::new().aggregate_family(&input).unwrap());

    assert_eq!(encoding.delta_bytes[0].len(), 6);
    assert_eq!(encoding.delta_bytes[1].len(), 8);
    assert_eq!(encoding.deltas[1].output_size_class, Some(loud.output_size_class));
    assert_eq!(encoding.report.compressed_total_bytes, 16 + 6 + 8);

    let children = decode_family(&encoding.family_bytes, &encoding.delta_slices()).unwrap();
    assert_eq!(children[1].output_size_class.value(), 6);
}

#[test]
fn output_class_overflows_when_metadata_disabled() {
    let config = AggregationConfig {
        emit_output_class_metadata: false,
        ..AggregationConfig::default()
    };
    let mut loud = Classification::new(RiskLevel::Low, CapabilityFlags::empty());
    loud.output_size_class = LogClass::new("output_size", 6).unwrap();
    let input = family_of(
        "docker",
        vec![
            child("ps", RiskLevel::Benign, CapabilityFlags::empty()),
            child("images", RiskLevel::Benign, CapabilityFlags::empty()),
            ClassifiedCommand::new("logs", loud),
        ],
    );
    let encoding =
        expect_family(FamilyAggregator::with_config(config).aggregate_family(&input).unwrap());
    assert_eq!(
        encoding.report.overflowed_children[0].reason,
        OverflowReason::OutputClass { class: 6 }
    );
}

// ── Not beneficial ───────────────────────────────────────────────────────

#[test]
fn single_member_family_is_not_beneficial() {
    let input = family_of(
        "git",
        vec![child("status", RiskLevel::Benign, CapabilityFlags::empty())],
    );
    let outcome = FamilyAggregator::new().aggregate_family(&input).unwrap();
    assert!(!outcome.is_family());
    assert_eq!(outcome.report().ratio, 1.0);
    assert_eq!(outcome.report().compressed_total_bytes, 24);

    let AggregationOutcome::NotBeneficial { singles, .. } = outcome else {
        panic!("expected standalone encoding");
    };
    assert_eq!(singles.len(), 1);
    assert_eq!(singles[0].name, "git status");
    let single = decode(&singles[0].bytes).unwrap();
    assert_eq!(single.name_hash, capguard_codec::name_hash("git status"));
    assert_eq!(single.name_len, 10);
}

#[test]
fn overflow_leaving_one_delta_is_not_beneficial() {
    let ext = CapabilityFlags::extension(5).unwrap();
    let input = family_of(
        "lvm",
        vec![
            child("lvs", RiskLevel::Benign, CapabilityFlags::empty()),
            child("lvremove", RiskLevel::Severe, ext),
        ],
    );
    let outcome = FamilyAggregator::new().aggregate_family(&input).unwrap();
    let AggregationOutcome::NotBeneficial { singles, report } = outcome else {
        panic!("expected standalone encoding");
    };
    assert_eq!(singles.len(), 2);
    assert_eq!(report.original_total_bytes, 48);
    assert_eq!(report.compressed_total_bytes, 48);
    assert!(report.overflowed_children.is_empty());
}

// ── Input errors ─────────────────────────────────────────────────────────

#[test]
fn empty_family_is_an_error() {
    let err = FamilyAggregator::new()
        .aggregate_family(&family_of("git", vec![]))
        .unwrap_err();
    assert_eq!(err, AggregationError::EmptyFamily { family: "git".into() });
}

#[test]
fn oversized_family_is_an_error() {
    let children = (0..256)
        .map(|i| child(&format!("c{i}"), RiskLevel::Benign, CapabilityFlags::empty()))
        .collect();
    let err = FamilyAggregator::new()
        .aggregate_family(&family_of("big", children))
        .unwrap_err();
    assert!(matches!(
        err,
        AggregationError::FamilyTooLarge { members: 256, max: 255, .. }
    ));

    let config = AggregationConfig {
        max_family_size: 3,
        ..AggregationConfig::default()
    };
    let children = (0..4)
        .map(|i| child(&format!("c{i}"), RiskLevel::Benign, CapabilityFlags::empty()))
        .collect();
    let err = FamilyAggregator::with_config(config)
        .aggregate_family(&family_of("small", children))
        .unwrap_err();
    assert!(matches!(err, AggregationError::FamilyTooLarge { max: 3, .. }));
}

#[test]
fn invalid_child_fails_the_whole_family() {
    let bad = ClassifiedCommand::new(
        "push",
        ClassificationInput {
            risk_ordinal: 9,
            ..ClassificationInput::default()
        },
    );
    let input = family_of(
        "git",
        vec![child("status", RiskLevel::Benign, CapabilityFlags::empty()), bad],
    );
    let err = FamilyAggregator::new().aggregate_family(&input).unwrap_err();
    assert_eq!(
        err,
        AggregationError::Codec(CodecError::InvalidRiskOrdinal { ordinal: 9 })
    );
    assert_eq!(err.error_code(), "INVALID_RISK_ORDINAL");
}

// ── Atomic decode ────────────────────────────────────────────────────────

#[test]
fn corrupted_parent_fails_the_whole_family() {
    let encoding = git_encoding();
    let mut parent = encoding.family_bytes;
    parent[9] ^= 0x01;
    let err = decode_family(&parent, &encoding.delta_slices()).unwrap_err();
    assert!(matches!(err, AggregationError::FamilyIntegrityError { .. }));
}

#[test]
fn any_corrupted_delta_fails_the_whole_family() {
    let encoding = git_encoding();
    for target in 0..encoding.delta_bytes.len() {
        for bit in 0..encoding.delta_bytes[target].len() * 8 {
            let mut deltas: Vec<Vec<u8>> = encoding
                .delta_bytes
                .iter()
                .map(|d| d.as_bytes().to_vec())
                .collect();
            deltas[target][bit / 8] ^= 1 << (bit % 8);
            let slices: Vec<&[u8]> = deltas.iter().map(Vec::as_slice).collect();
            let result = decode_family(&encoding.family_bytes, &slices);
            assert!(
                matches!(result, Err(AggregationError::FamilyIntegrityError { .. })),
                "delta {target} bit {bit} gave {result:?}"
            );
        }
    }
}

#[test]
fn delta_count_must_match_parent() {
    let encoding = git_encoding();
    let mut slices = encoding.delta_slices();
    slices.pop();
    assert!(matches!(
        decode_family(&encoding.family_bytes, &slices),
        Err(AggregationError::FamilyIntegrityError { .. })
    ));

    let mut slices = encoding.delta_slices();
    slices.push(slices[0]);
    assert!(matches!(
        decode_family(&encoding.family_bytes, &slices),
        Err(AggregationError::FamilyIntegrityError { .. })
    ));
}

#[test]
fn parent_structure_errors_keep_codec_categories() {
    let encoding = git_encoding();
    let deltas = encoding.delta_slices();

    let short = &encoding.family_bytes[..15];
    assert!(matches!(
        decode_family(short, &deltas),
        Err(AggregationError::Codec(CodecError::MalformedInput { .. }))
    ));

    let mut wrong_tag = encoding.family_bytes;
    wrong_tag[1] = 0x01;
    integrity::seal(&mut wrong_tag);
    assert!(matches!(
        decode_family(&wrong_tag, &deltas),
        Err(AggregationError::Codec(CodecError::MalformedInput { .. }))
    ));

    let mut new_version = encoding.family_bytes;
    new_version[3] = 0x09;
    integrity::seal(&mut new_version);
    assert_eq!(
        decode_family(&new_version, &deltas).unwrap_err(),
        AggregationError::Codec(CodecError::UnsupportedVersion { version: 9 })
    );

    let mut unknown_kind = encoding.family_bytes;
    unknown_kind[13] = 0x7f;
    integrity::seal(&mut unknown_kind);
    assert!(matches!(
        decode_family(&unknown_kind, &deltas),
        Err(AggregationError::Codec(CodecError::MalformedInput { .. }))
    ));
}

#[test]
fn child_that_fails_revalidation_fails_the_family() {
    let parent = family::encode(&FamilyHeader {
        schema_version: 1,
        family_hash: 0x0102_0304,
        common_flags: CapabilityFlags::empty(),
        risk_floor: RiskLevel::High,
        child_count: 2,
        kind: FamilyKind::Generic,
    });
    let fields = |hash, risk_delta| DeltaFields {
        subcommand_hash: hash,
        risk_delta,
        delta_flags: CapabilityFlags::empty(),
        exec_time_class: LogClass::MIN,
        memory_class: LogClass::MIN,
        metadata: DeltaMetadata::default(),
    };
    let ok = delta::encode(&fields(1, 1)).unwrap();
    let too_risky = delta::encode(&fields(2, 2)).unwrap();

    assert_eq!(
        decode_family(&parent, &[ok.as_bytes(), ok.as_bytes()]).unwrap()[0].risk,
        RiskLevel::Severe
    );
    let err = decode_family(&parent, &[ok.as_bytes(), too_risky.as_bytes()]).unwrap_err();
    assert!(matches!(err, AggregationError::FamilyIntegrityError { .. }));
    assert!(err.to_string().contains("delta 1"));
}

#[test]
fn delta_with_malformed_metadata_fails_the_family() {
    let encoding = git_encoding();
    let mut odd = encoding.delta_bytes[0].as_bytes()[..4].to_vec();
    odd.extend_from_slice(&[0x10, 0x00, 0x00]);
    integrity::seal(&mut odd);
    let mut slices = encoding.delta_slices();
    slices[0] = odd.as_slice();
    assert!(matches!(
        decode_family(&encoding.family_bytes, &slices),
        Err(AggregationError::FamilyIntegrityError { .. })
    ));
}

#[test]
fn trait_object_decodes_like_free_function() {
    let encoding = git_encoding();
    let aggregator: Box<dyn IAggregator> = Box::new(FamilyAggregator::new());
    assert_eq!(
        aggregator
            .decode_family(&encoding.family_bytes, &encoding.delta_slices())
            .unwrap(),
        decode_family(&encoding.family_bytes, &encoding.delta_slices()).unwrap()
    );
}

#[test]
fn decoded_records_come_from_bytes_not_typed_fields() {
    let mut encoding = git_encoding();
    let honest = (encoding.family, encoding.deltas.clone());
    encoding.family.common_flags = CapabilityFlags::NETWORK_ACCESS;
    encoding.deltas[1].risk_delta = 0;

    let decoded = decode_family_records(&encoding.family_bytes, &encoding.delta_slices()).unwrap();
    assert_eq!(decoded.deltas[2].subcommand_hash, subcommand_hash("reset --hard"));
    assert_eq!((decoded.family, decoded.deltas), honest);
    assert_eq!(
        decoded.children,
        decode_family(&encoding.family_bytes, &encoding.delta_slices()).unwrap()
    );
}

// ── Batch aggregation ────────────────────────────────────────────────────

#[test]
fn aggregate_families_preserves_order_and_isolates_errors() {
    let git = test_fixtures::family_scenario("git").family;
    let inputs = vec![
        git.clone(),
        family_of("empty", vec![]),
        family_of(
            "solo",
            vec![child("run", RiskLevel::Low, CapabilityFlags::empty())],
        ),
        git,
    ];
    let results = FamilyAggregator::new().aggregate_families(&inputs);

    assert_eq!(results.len(), 4);
    assert!(results[0].as_ref().unwrap().is_family());
    assert!(matches!(results[1], Err(AggregationError::EmptyFamily { .. })));
    assert!(!results[2].as_ref().unwrap().is_family());
    assert_eq!(
        results[3].as_ref().unwrap().report(),
        results[0].as_ref().unwrap().report()
    );
}
