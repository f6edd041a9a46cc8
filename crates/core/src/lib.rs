#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod stage;

// --- 주요 타입 re-export ---

// 에러 타입
pub use error::{ConfigError, StageError, StampostError};

// 이벤트 타입
pub use event::{EventMetadata, LogEvent};

// 설정 타입
pub use config::{GeneralConfig, GeneratorConfig, StageSpec, StampostConfig};

// 스테이지 타입
pub use stage::{Stage, StageConstructor, StageInfo, StageRegistry};
