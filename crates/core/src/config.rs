//! 설정 관리: stampost.toml 파싱 및 런타임 설정
//!
//! [`StampostConfig`]는 모든 섹션의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`STAMPOST_GENERAL_LOG_LEVEL=debug` 형식)
//! 3. 설정 파일 (`stampost.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # fn example() -> Result<(), stampost_core::error::StampostError> {
//! use stampost_core::config::StampostConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = StampostConfig::load("stampost.toml")?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = StampostConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, StampostError};

/// Stampost 통합 설정
///
/// `stampost.toml` 파일의 최상위 구조를 나타냅니다.
/// `[[stages]]` 블록은 선언 순서대로 보존됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StampostConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// generate 명령 기본값
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// 스테이지 선언 목록
    #[serde(default)]
    pub stages: Vec<StageSpec>,
}

impl StampostConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StampostError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StampostError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StampostError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                StampostError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, StampostError> {
        toml::from_str(toml_str).map_err(|e| {
            StampostError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `STAMPOST_{SECTION}_{FIELD}`
    /// 예: `STAMPOST_GENERAL_LOG_LEVEL=debug`
    ///
    /// 스테이지 설정(`[[stages]]`)은 환경변수 오버라이드 대상이 아닙니다.
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "STAMPOST_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "STAMPOST_GENERAL_LOG_FORMAT");

        // Generator
        override_string(
            &mut self.generator.template_dir,
            "STAMPOST_GENERATOR_TEMPLATE_DIR",
        );
        override_string(
            &mut self.generator.agent_prefix,
            "STAMPOST_GENERATOR_AGENT_PREFIX",
        );
        override_string(
            &mut self.generator.source_prefix,
            "STAMPOST_GENERATOR_SOURCE_PREFIX",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), StampostError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // generator 경로/접두사 검증
        if self.generator.template_dir.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "generator.template_dir".to_owned(),
                reason: "template_dir must not be empty".to_owned(),
            }
            .into());
        }
        if self.generator.agent_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "generator.agent_prefix".to_owned(),
                reason: "agent_prefix must not be empty".to_owned(),
            }
            .into());
        }
        if self.generator.source_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "generator.source_prefix".to_owned(),
                reason: "source_prefix must not be empty".to_owned(),
            }
            .into());
        }

        // 스테이지 kind 검증
        for (idx, stage) in self.stages.iter().enumerate() {
            if stage.kind.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("stages[{idx}].kind"),
                    reason: "kind must not be empty".to_owned(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// generate 명령 기본값
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// 템플릿 디렉토리 경로
    pub template_dir: String,
    /// 에이전트 이름 접두사 (예: "agent" -> agent_10_0_0_1)
    pub agent_prefix: String,
    /// 소스 이름 접두사 (예: "src" -> src1 src2 ...)
    pub source_prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template_dir: "templates".to_owned(),
            agent_prefix: "agent".to_owned(),
            source_prefix: "src".to_owned(),
        }
    }
}

/// `[[stages]]` 블록 하나
///
/// `kind`와 `name`을 제외한 나머지 키는 스테이지별 설정으로,
/// 레지스트리에 등록된 생성자가 해석합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSpec {
    /// 스테이지 인스턴스 이름 (없으면 kind를 사용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 레지스트리에 등록된 스테이지 종류 식별자
    pub kind: String,
    /// 나머지 키 전부 (스테이지별 설정)
    #[serde(flatten)]
    pub settings: toml::Table,
}

impl StageSpec {
    /// 새 스테이지 선언을 만듭니다. 설정은 비어 있습니다.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            name: None,
            kind: kind.into(),
            settings: toml::Table::new(),
        }
    }

    /// 로깅/리포트에 쓰는 표시 이름. `name`이 없으면 `kind`입니다.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.kind)
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}
