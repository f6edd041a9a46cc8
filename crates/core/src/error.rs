//! 에러 타입: 도메인별 에러 정의

/// Stampost 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum StampostError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 스테이지 레지스트리/생성 에러
    #[error("stage error: {0}")]
    Stage(#[from] StageError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 스테이지 레지스트리/생성 에러
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// 이미 등록된 스테이지 종류
    #[error("stage kind already registered: {kind}")]
    AlreadyRegistered { kind: String },

    /// 등록되지 않은 스테이지 종류
    #[error("unknown stage kind: {kind}")]
    UnknownKind { kind: String },

    /// 스테이지 설정이 잘못됨
    #[error("invalid settings for stage '{kind}': {reason}")]
    InvalidSettings { kind: String, reason: String },
}
