//! 헤더 주입 스테이지 설정
//!
//! [`EnricherConfig`]는 `[[stages]]` 블록에서 `kind`와 `name`을 제외한
//! 키들을 받아들입니다. 모든 필드에 기본값이 있으므로 빈 블록도
//! 유효한 설정입니다.
//!
//! # 사용 예시
//! ```
//! use stampost_enricher::config::EnricherConfig;
//!
//! let config: EnricherConfig = toml::from_str(r#"
//!     key_values = "dc:ap-east env:prod"
//! "#).unwrap();
//! assert!(config.preserve_existing);
//! assert_eq!(config.separator, ":");
//! ```

use serde::{Deserialize, Serialize};

use stampost_core::error::ConfigError;

/// 정적 헤더 주입 스테이지 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnricherConfig {
    /// 기존 헤더 보존 여부. true면 이벤트에 이미 있는 키를 건너뜁니다.
    pub preserve_existing: bool,
    /// 공백으로 구분된 key-value 토큰 문자열 (예: `"dc:ap-east env:prod"`)
    pub key_values: String,
    /// 키와 값 사이 구분자
    pub separator: String,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            preserve_existing: true,
            key_values: String::new(),
            separator: ":".to_owned(),
        }
    }
}

impl EnricherConfig {
    /// 설정값의 유효성을 검증합니다.
    ///
    /// 빈 구분자는 모든 토큰을 버리게 만들므로 설정 단계에서 거부합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.separator.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "separator".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}
