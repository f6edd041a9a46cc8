//! 헤더 주입 스테이지 경고 타입
//!
//! [`ParseWarning`]은 key-value 파싱 중 버려진 토큰 하나를 설명합니다.
//! 파싱은 전체가 실패하는 일이 없으므로 이 타입은 `Result`의 `Err`가
//! 아니라 파싱 결과에 동봉되는 목록으로 전달됩니다.

/// key-value 토큰 파싱 경고
///
/// 토큰 하나가 버려질 때마다 하나씩 생성됩니다. 경고가 있어도
/// 나머지 토큰 처리는 계속됩니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseWarning {
    /// 구분자가 없는 토큰
    #[error("malformed pair '{token}': missing separator '{separator}'")]
    MalformedPair {
        /// 버려진 토큰 원문
        token: String,
        /// 기대한 구분자
        separator: String,
    },

    /// 키가 비어 있는 토큰
    #[error("empty key in pair '{token}'")]
    EmptyKey {
        /// 버려진 토큰 원문
        token: String,
    },
}

impl ParseWarning {
    /// 메트릭 label에 쓰는 사유 문자열을 반환합니다.
    pub fn reason_label(&self) -> &'static str {
        match self {
            ParseWarning::MalformedPair { .. } => "missing_separator",
            ParseWarning::EmptyKey { .. } => "empty_key",
        }
    }

    /// 버려진 토큰 원문을 반환합니다.
    pub fn token(&self) -> &str {
        match self {
            ParseWarning::MalformedPair { token, .. } => token,
            ParseWarning::EmptyKey { token } => token,
        }
    }
}
