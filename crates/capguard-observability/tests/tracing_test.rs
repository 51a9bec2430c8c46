use capguard_core::config::ObservabilityConfig;
use capguard_observability::tracing_setup::{self, spans};
use capguard_observability::{
    aggregation_span, decode_family_span, init_tracing, init_with_config, publish_span,
};

// ── Initialization ───────────────────────────────────────────────────────

#[test]
fn init_is_idempotent() {
    init_tracing();
    init_tracing();
    init_with_config(&ObservabilityConfig {
        log_level: "debug".to_string(),
        json: true,
    });
    assert!(tracing_setup::is_initialized());
}

#[test]
fn env_var_name_is_stable() {
    assert_eq!(tracing_setup::LOG_ENV_VAR, "CAPGUARD_LOG");
}

// ── Spans ───────────────────────────────────────────────────────────────

#[test]
fn span_names_are_namespaced() {
    for name in [spans::names::AGGREGATE, spans::names::DECODE_FAMILY, spans::names::PUBLISH] {
        assert!(name.starts_with("capguard."), "{name}");
    }
}

#[test]
fn span_macros_enter_and_exit() {
    init_tracing();
    let family = "git";
    {
        let _aggregate = aggregation_span!(family, 3usize).entered();
        let _decode = decode_family_span!(3usize).entered();
        tracing::info!("inside nested spans");
    }
    let publish = publish_span!(family);
    publish.in_scope(|| tracing::info!("publishing"));
}
