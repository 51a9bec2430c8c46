use std::io::Write;

use capguard_classify::rules;
use capguard_classify::{
    classify_family, ChainClassifier, CuratedClassifier, HeuristicClassifier, HeuristicRule,
};
use capguard_core::classification::{CapabilityFlags, Classification, RiskLevel};
use capguard_core::errors::{ClassifierError, ErrorCode};
use capguard_core::traits::IClassifier;
use proptest::prelude::*;

const CURATED: &str = "golden/classifier/curated_basic.toml";

fn curated() -> CuratedClassifier {
    CuratedClassifier::from_path(test_fixtures::fixture_path(CURATED)).unwrap()
}

fn risk_of(classifier: &dyn IClassifier, command: &str) -> RiskLevel {
    classifier.classify(command).unwrap().validate().unwrap().risk
}

// ── Curated table ────────────────────────────────────────────────────────

#[test]
fn curated_table_loads_golden_file() {
    let classifier = curated();
    assert_eq!(classifier.len(), 5);
    assert_eq!(
        classifier.names(),
        vec!["cat", "curl", "git push", "git status", "rm"]
    );
}

#[test]
fn curated_entries_carry_flags_and_classes() {
    let classifier = curated();

    let rm = classifier.classify("rm").unwrap().validate().unwrap();
    assert_eq!(rm.risk, RiskLevel::Severe);
    assert_eq!(rm.capabilities.bits(), 88);

    let curl = classifier.classify("curl").unwrap();
    assert_eq!(curl.capability_flags, CapabilityFlags::NETWORK_ACCESS.bits());
    assert_eq!(curl.exec_time_class, 3);
    assert_eq!(curl.output_size_class, 4);
    assert_eq!(curl.memory_class, 0);
}

#[test]
fn curated_lookup_normalizes_whitespace() {
    let classifier = curated();
    assert_eq!(risk_of(&classifier, "  git   push "), RiskLevel::Moderate);
    assert!(classifier.contains("git\tstatus"));
}

#[test]
fn curated_miss_is_unknown_command() {
    let err = curated().classify("terraform apply").unwrap_err();
    assert!(matches!(err, ClassifierError::UnknownCommand { ref name } if name == "terraform apply"));
    assert_eq!(err.error_code(), "UNKNOWN_COMMAND");
}

#[test]
fn curated_rejects_unknown_flag_name() {
    let text = r#"
        [[commands]]
        name = "mv"
        risk = "low"
        capabilities = ["TELEPORT"]
    "#;
    let err = CuratedClassifier::from_toml("inline", text).unwrap_err();
    assert!(err.to_string().contains("TELEPORT"));
    assert_eq!(err.error_code(), "CLASSIFIER_TABLE_ERROR");
}

#[test]
fn curated_rejects_out_of_range_class() {
    let text = r#"
        [[commands]]
        name = "sleep"
        risk = "benign"
        exec_time_class = 16
    "#;
    assert!(CuratedClassifier::from_toml("inline", text).is_err());
}

#[test]
fn curated_rejects_unknown_risk_and_duplicates() {
    let bad_risk = r#"
        [[commands]]
        name = "mv"
        risk = "apocalyptic"
    "#;
    assert!(CuratedClassifier::from_toml("inline", bad_risk).is_err());

    let duplicate = r#"
        [[commands]]
        name = "mv"
        risk = "low"

        [[commands]]
        name = "mv"
        risk = "high"
    "#;
    let err = CuratedClassifier::from_toml("inline", duplicate).unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn curated_accepts_flag_names_case_insensitively() {
    let text = r#"
        [[commands]]
        name = "kill"
        risk = "moderate"
        capabilities = ["process_control"]
    "#;
    let classifier = CuratedClassifier::from_toml("inline", text).unwrap();
    let kill = classifier.classify("kill").unwrap();
    assert_eq!(kill.capability_flags, CapabilityFlags::PROCESS_CONTROL.bits());
}

#[test]
fn curated_from_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[[commands]]\nname = \"ls\"\nrisk = \"benign\"").unwrap();

    let classifier = CuratedClassifier::from_path(file.path()).unwrap();
    assert_eq!(risk_of(&classifier, "ls"), RiskLevel::Benign);
}

#[test]
fn curated_missing_file_is_table_error() {
    let err = CuratedClassifier::from_path("/nonexistent/curated.toml").unwrap_err();
    assert!(matches!(err, ClassifierError::TableLoad { .. }));
}

#[test]
fn curated_insert_validates() {
    let mut classifier = CuratedClassifier::default();
    let good = Classification::new(RiskLevel::High, CapabilityFlags::SYSTEM_MODIFICATION);
    classifier.insert("reboot", good.to_input()).unwrap();
    assert_eq!(risk_of(&classifier, "reboot"), RiskLevel::High);

    let mut bad = good.to_input();
    bad.risk_ordinal = 9;
    assert!(classifier.insert("halt", bad).is_err());
    assert!(!classifier.contains("halt"));
}

// ── Heuristic rules ─────────────────────────────────────────────────────

#[test]
fn builtin_rules_all_compile() {
    for rule in rules::all_rules() {
        assert!(rule.regex.is_some(), "rule {} failed to compile", rule.name);
    }
    assert_eq!(
        HeuristicClassifier::new().rule_names(),
        vec!["destructive", "privilege", "permissions", "network", "read_only"]
    );
}

#[test]
fn heuristic_classifies_known_shapes() {
    let classifier = HeuristicClassifier::new();
    assert_eq!(risk_of(&classifier, "rm -rf /tmp/x"), RiskLevel::Severe);
    assert_eq!(risk_of(&classifier, "mkfs.ext4 /dev/sdb1"), RiskLevel::Severe);
    assert_eq!(risk_of(&classifier, "sudo apt update"), RiskLevel::High);
    assert_eq!(risk_of(&classifier, "chmod 777 file"), RiskLevel::High);
    assert_eq!(risk_of(&classifier, "curl https://example.com"), RiskLevel::Moderate);
    assert_eq!(risk_of(&classifier, "cat /etc/hosts"), RiskLevel::Benign);
    assert_eq!(risk_of(&classifier, "ls"), RiskLevel::Benign);
}

#[test]
fn heuristic_first_match_wins() {
    let classifier = HeuristicClassifier::new();
    let sudo_rm = classifier.classify("sudo rm -rf /").unwrap().validate().unwrap();
    assert_eq!(sudo_rm.risk, RiskLevel::Severe);
    assert!(sudo_rm.capabilities.contains(CapabilityFlags::DESTRUCTIVE));
    assert_eq!(
        classifier.matching_rule("sudo rm -rf /").unwrap().name(),
        "destructive"
    );
}

#[test]
fn heuristic_matches_whole_command_words() {
    let classifier = HeuristicClassifier::new();
    assert_eq!(risk_of(&classifier, "rmdir build"), RiskLevel::Low);
    assert_eq!(risk_of(&classifier, "category list"), RiskLevel::Low);
    assert!(classifier.matching_rule("rmdir build").is_none());
}

#[test]
fn heuristic_falls_back_to_low() {
    let classifier = HeuristicClassifier::new();
    let input = classifier.classify("make install").unwrap();
    assert_eq!(input.risk_ordinal, RiskLevel::Low.ordinal());
    assert_eq!(input.capability_flags, 0);

    let strict = HeuristicClassifier::empty()
        .with_fallback(Classification::new(RiskLevel::High, CapabilityFlags::empty()));
    assert_eq!(risk_of(&strict, "anything"), RiskLevel::High);
}

#[test]
fn custom_rules_respect_position() {
    let terraform = HeuristicRule::new(
        "terraform_destroy",
        r"^terraform\s+destroy",
        Classification::new(RiskLevel::Severe, CapabilityFlags::DESTRUCTIVE),
    )
    .unwrap();
    let classifier = HeuristicClassifier::new().with_rule(terraform);
    assert_eq!(risk_of(&classifier, "terraform destroy -auto-approve"), RiskLevel::Severe);

    let quiet_cat = HeuristicRule::new(
        "cat_override",
        r"^cat\s",
        Classification::new(RiskLevel::Low, CapabilityFlags::READS_SENSITIVE_DATA),
    )
    .unwrap();
    let classifier = HeuristicClassifier::new().with_priority_rule(quiet_cat);
    assert_eq!(risk_of(&classifier, "cat /etc/shadow"), RiskLevel::Low);
}

#[test]
fn invalid_rule_pattern_is_rejected() {
    let err = HeuristicRule::new("broken", "(unclosed", Classification::default()).unwrap_err();
    assert!(matches!(err, ClassifierError::InvalidRule { ref pattern, .. } if pattern == "(unclosed"));
    assert_eq!(err.error_code(), "CLASSIFIER_RULE_ERROR");
}

// ── Chain ───────────────────────────────────────────────────────────────

#[test]
fn chain_prefers_earlier_sources() {
    let chain = ChainClassifier::new()
        .with(Box::new(curated()))
        .with(Box::new(HeuristicClassifier::new()));
    assert_eq!(chain.len(), 2);

    // Curated says moderate; the heuristic has no rule for git.
    assert_eq!(risk_of(&chain, "git push"), RiskLevel::Moderate);
    // Curated miss falls through to the heuristic.
    assert_eq!(risk_of(&chain, "wget file"), RiskLevel::Moderate);
    assert_eq!(risk_of(&chain, "git rebase"), RiskLevel::Low);
    assert_eq!(chain.source_name(), "chain");
}

#[test]
fn chain_reports_last_error_when_all_decline() {
    let chain = ChainClassifier::new().with(Box::new(curated()));
    let err = chain.classify("terraform plan").unwrap_err();
    assert!(matches!(err, ClassifierError::UnknownCommand { .. }));

    let empty = ChainClassifier::new();
    assert!(empty.is_empty());
    assert!(matches!(
        empty.classify("ls"),
        Err(ClassifierError::UnknownCommand { .. })
    ));
}

// ── Family classification ──────────────────────────────────────────────

#[test]
fn classify_family_names_children_by_subcommand() {
    let classifier = curated();
    let children = classify_family(&classifier, "git", &["status", "push"]).unwrap();

    assert_eq!(children.len(), 2);
    assert_eq!(children[0].name, "status");
    assert_eq!(children[1].name, "push");
    assert_eq!(
        children[1].classification.capability_flags,
        CapabilityFlags::NETWORK_ACCESS.bits()
    );
}

#[test]
fn classify_family_fails_on_first_unknown() {
    let classifier = curated();
    let err = classify_family(&classifier, "git", &["status", "bisect"]).unwrap_err();
    assert!(matches!(err, ClassifierError::UnknownCommand { ref name } if name == "git bisect"));
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn prop_heuristic_output_is_always_valid(command in ".{0,64}") {
        let input = HeuristicClassifier::new().classify(&command).unwrap();
        prop_assert!(input.validate().is_ok());
    }
}
