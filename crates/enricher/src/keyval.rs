//! 공백 구분 key-value 토큰 파서
//!
//! `"dc:ap-east env:prod"` 형태의 문자열을 정적 헤더 맵으로 변환합니다.
//! 토큰 단위로 관대하게 동작합니다. 형식이 깨진 토큰은 경고와 함께
//! 버려지고 나머지 토큰 처리는 계속됩니다.
//!
//! # 파싱 규칙
//! - 토큰은 유니코드 공백 기준으로 분리됩니다.
//! - 각 토큰은 첫 번째 구분자 위치에서 키와 값으로 나뉩니다.
//! - 키와 값의 앞뒤 공백은 제거됩니다.
//! - 구분자가 없는 토큰과 키가 빈 토큰은 버려집니다.
//! - 같은 키가 반복되면 마지막 토큰이 이깁니다.
//! - 값이 빈 토큰(`debug:`)은 빈 문자열 값으로 저장됩니다.
//!
//! # 사용 예시
//! ```
//! use stampost_enricher::keyval::KeyValueSpec;
//!
//! let outcome = KeyValueSpec::new("dc:ap-east env:prod", ":").parse();
//! assert_eq!(outcome.headers.get("dc"), Some("ap-east"));
//! assert!(outcome.warnings.is_empty());
//! ```

use std::collections::HashMap;

use tracing::warn;

use stampost_core::metrics::{KEYVAL_TOKENS_DROPPED_TOTAL, KEYVAL_TOKENS_PARSED_TOTAL, LABEL_REASON};

use crate::error::ParseWarning;

/// 파싱으로 얻은 정적 헤더 맵
///
/// 키는 전부 비어 있지 않습니다. 순회 순서는 보장되지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticHeaderMap {
    entries: HashMap<String, String>,
}

impl StaticHeaderMap {
    /// 키에 해당하는 값을 반환합니다.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// 키가 존재하는지 확인합니다.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// 저장된 항목 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 항목이 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (키, 값) 쌍을 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// 파싱 결과
///
/// 파싱은 항상 완료됩니다. 버려진 토큰은 [`warnings`](Self::warnings)에
/// 토큰 등장 순서대로 기록됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// 수집된 key-value 헤더
    pub headers: StaticHeaderMap,
    /// 버려진 토큰별 경고 (토큰 등장 순서)
    pub warnings: Vec<ParseWarning>,
}

/// key-value 문자열 파싱 사양
///
/// 원본 문자열과 구분자를 묶어 들고 다니며, [`parse`](Self::parse)가
/// 호출될 때마다 동일한 결과를 냅니다.
#[derive(Debug, Clone)]
pub struct KeyValueSpec {
    /// 공백 구분 토큰 원본
    raw: String,
    /// 키/값 구분자
    separator: String,
}

impl KeyValueSpec {
    /// 새 파싱 사양을 생성합니다.
    pub fn new(raw: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            separator: separator.into(),
        }
    }

    /// 구분자를 반환합니다.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// 원본 문자열을 파싱합니다.
    ///
    /// 이 메서드는 실패하지 않습니다. 버려진 토큰마다 경고 로그를 남기고
    /// 드롭 카운터를 올린 뒤 [`ParseOutcome::warnings`]에 기록합니다.
    pub fn parse(&self) -> ParseOutcome {
        let mut entries = HashMap::new();
        let mut warnings = Vec::new();

        for token in self.raw.split_whitespace() {
            match self.split_token(token) {
                Ok((key, value)) => {
                    metrics::counter!(KEYVAL_TOKENS_PARSED_TOTAL).increment(1);
                    // 같은 키가 반복되면 마지막 토큰이 이김
                    entries.insert(key, value);
                }
                Err(warning) => {
                    warn!(
                        token = warning.token(),
                        reason = warning.reason_label(),
                        "discarding key-value token"
                    );
                    metrics::counter!(
                        KEYVAL_TOKENS_DROPPED_TOTAL,
                        LABEL_REASON => warning.reason_label()
                    )
                    .increment(1);
                    warnings.push(warning);
                }
            }
        }

        ParseOutcome {
            headers: StaticHeaderMap { entries },
            warnings,
        }
    }

    /// 토큰 하나를 첫 번째 구분자 위치에서 키/값으로 분할합니다.
    fn split_token(&self, token: &str) -> Result<(String, String), ParseWarning> {
        let Some(sep_idx) = token.find(self.separator.as_str()) else {
            return Err(ParseWarning::MalformedPair {
                token: token.to_owned(),
                separator: self.separator.clone(),
            });
        };

        let key = token[..sep_idx].trim();
        let value = token[sep_idx + self.separator.len()..].trim();

        if key.is_empty() {
            return Err(ParseWarning::EmptyKey {
                token: token.to_owned(),
            });
        }

        Ok((key.to_owned(), value.to_owned()))
    }
}
