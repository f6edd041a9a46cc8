//! stampost.toml 통합 설정 테스트
//!
//! - stampost.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use stampost_core::config::StampostConfig;
use stampost_core::error::{ConfigError, StampostError};

// =============================================================================
// stampost.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../stampost.toml.example");
    let config = StampostConfig::parse(content).expect("example config should parse");

    // general 기본값 확인
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "json");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../stampost.toml.example");
    let config = StampostConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_has_correct_generator_defaults() {
    let content = include_str!("../../../stampost.toml.example");
    let config = StampostConfig::parse(content).expect("should parse");

    assert_eq!(config.generator.template_dir, "templates");
    assert_eq!(config.generator.agent_prefix, "agent");
    assert_eq!(config.generator.source_prefix, "src");
}

#[test]
fn example_config_declares_static_headers_stage() {
    let content = include_str!("../../../stampost.toml.example");
    let config = StampostConfig::parse(content).expect("should parse");

    assert_eq!(config.stages.len(), 1);
    let stage = &config.stages[0];
    assert_eq!(stage.kind, "static_headers");
    assert_eq!(stage.display_name(), "datacenter-tags");
    assert_eq!(
        stage.settings.get("key_values").and_then(|v| v.as_str()),
        Some("dc:ap-east env:prod")
    );
    assert_eq!(
        stage.settings.get("separator").and_then(|v| v.as_str()),
        Some(":")
    );
    assert_eq!(
        stage
            .settings
            .get("preserve_existing")
            .and_then(|v| v.as_bool()),
        Some(true)
    );
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../stampost.toml.example");
    let from_file = StampostConfig::parse(content).expect("should parse");
    let from_code = StampostConfig::default();

    // general/generator 기본값이 코드 Default 구현과 일치하는지 확인
    assert_eq!(from_file.general.log_level, from_code.general.log_level);
    assert_eq!(from_file.general.log_format, from_code.general.log_format);
    assert_eq!(
        from_file.generator.template_dir,
        from_code.generator.template_dir
    );
    assert_eq!(
        from_file.generator.agent_prefix,
        from_code.generator.agent_prefix
    );
    assert_eq!(
        from_file.generator.source_prefix,
        from_code.generator.source_prefix
    );
}

// =============================================================================
// 부분 설정 로딩 테스트
// =============================================================================

#[test]
fn partial_config_general_only() {
    let toml = r#"
[general]
log_level = "debug"
"#;
    let config = StampostConfig::parse(toml).expect("should parse");
    assert_eq!(config.general.log_level, "debug");
    // 나머지 섹션은 기본값
    assert_eq!(config.generator.template_dir, "templates");
    assert!(config.stages.is_empty());
}

#[test]
fn partial_config_stages_only() {
    let toml = r#"
[[stages]]
kind = "static_headers"
key_values = "env:staging"

[[stages]]
kind = "static_headers"
key_values = "team=infra"
separator = "="
"#;
    let config = StampostConfig::parse(toml).expect("should parse");
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.stages.len(), 2);
    assert_eq!(config.stages[0].display_name(), "static_headers");
    assert_eq!(
        config.stages[1]
            .settings
            .get("separator")
            .and_then(|v| v.as_str()),
        Some("=")
    );
}

#[test]
fn empty_config_parses_to_defaults() {
    let config = StampostConfig::parse("").expect("empty toml should parse");
    assert_eq!(config.general.log_level, "info");
    assert!(config.stages.is_empty());
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[general]
log_level = "info"
"#;

    let original = std::env::var("STAMPOST_GENERAL_LOG_LEVEL").ok();
    // SAFETY: 테스트는 serial로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("STAMPOST_GENERAL_LOG_LEVEL", "error");
    }

    let mut config = StampostConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.general.log_level.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("STAMPOST_GENERAL_LOG_LEVEL", val),
            None => std::env::remove_var("STAMPOST_GENERAL_LOG_LEVEL"),
        }
    }

    assert_eq!(result, "error");
}

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_defaults() {
    let original = std::env::var("STAMPOST_GENERATOR_AGENT_PREFIX").ok();
    // SAFETY: 테스트는 serial로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("STAMPOST_GENERATOR_AGENT_PREFIX", "node");
    }

    let mut config = StampostConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let result = config.generator.agent_prefix.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("STAMPOST_GENERATOR_AGENT_PREFIX", val),
            None => std::env::remove_var("STAMPOST_GENERATOR_AGENT_PREFIX"),
        }
    }

    assert_eq!(result, "node");
}

#[test]
#[serial_test::serial]
fn env_override_missing_var_keeps_toml_value() {
    let toml = r#"
[general]
log_level = "warn"
"#;

    // SAFETY: 존재하지 않는 변수를 명시적으로 제거
    unsafe {
        std::env::remove_var("STAMPOST_GENERAL_LOG_LEVEL");
    }

    let mut config = StampostConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();

    assert_eq!(config.general.log_level, "warn");
}

#[test]
#[serial_test::serial]
fn env_overrides_do_not_touch_stage_settings() {
    let toml = r#"
[[stages]]
kind = "static_headers"
key_values = "env:prod"
"#;

    let original = std::env::var("STAMPOST_GENERAL_LOG_LEVEL").ok();
    // SAFETY: 테스트는 serial로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("STAMPOST_GENERAL_LOG_LEVEL", "debug");
    }

    let mut config = StampostConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let key_values = config.stages[0]
        .settings
        .get("key_values")
        .and_then(|v| v.as_str())
        .map(str::to_owned);

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("STAMPOST_GENERAL_LOG_LEVEL", val),
            None => std::env::remove_var("STAMPOST_GENERAL_LOG_LEVEL"),
        }
    }

    assert_eq!(key_values.as_deref(), Some("env:prod"));
}

// =============================================================================
// 파일 로딩 / 에러 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn load_reads_file_and_applies_overrides() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("stampost.toml");
    std::fs::write(
        &path,
        r#"
[general]
log_level = "warn"

[[stages]]
kind = "static_headers"
key_values = "dc:ap-east"
"#,
    )
    .expect("should write config");

    // SAFETY: 관련 변수가 비어 있는 상태를 보장
    unsafe {
        std::env::remove_var("STAMPOST_GENERAL_LOG_LEVEL");
    }

    let config = StampostConfig::load(&path).expect("should load");
    assert_eq!(config.general.log_level, "warn");
    assert_eq!(config.stages.len(), 1);
}

#[test]
fn from_file_missing_returns_file_not_found() {
    let result = StampostConfig::from_file("/nonexistent/stampost.toml");
    assert!(matches!(
        result,
        Err(StampostError::Config(ConfigError::FileNotFound { .. }))
    ));
}

#[test]
fn from_file_rejects_invalid_values() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("stampost.toml");
    std::fs::write(
        &path,
        r#"
[general]
log_level = "verbose"
"#,
    )
    .expect("should write config");

    let result = StampostConfig::from_file(&path);
    assert!(matches!(
        result,
        Err(StampostError::Config(ConfigError::InvalidValue { .. }))
    ));
}

#[test]
fn invalid_toml_returns_parse_failed() {
    let result = StampostConfig::parse("stages = [[[broken");
    assert!(matches!(
        result,
        Err(StampostError::Config(ConfigError::ParseFailed { .. }))
    ));
}
