#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`keyval`]: 공백 구분 key-value 토큰 파서 (관대한 토큰 단위 처리)
//! - [`enricher`]: 정적 헤더 주입 스테이지 ([`Stage`](stampost_core::Stage) 구현)
//! - [`config`]: 스테이지 설정 ([`EnricherConfig`])
//! - [`error`]: 파싱 경고 타입
//!
//! # 처리 흐름
//!
//! ```text
//! [[stages]] 설정 -> EnricherConfig -> KeyValueSpec::parse -> HeaderEnricher
//!                                          |                      |
//!                                    경고 + 드롭 카운터      이벤트 헤더 병합
//! ```

pub mod config;
pub mod enricher;
pub mod error;
pub mod keyval;

// --- 주요 타입 re-export ---

// 스테이지
pub use enricher::{HeaderEnricher, HeaderEnricherBuilder, STATIC_HEADERS_KIND, register_defaults};

// 설정
pub use config::EnricherConfig;

// 파서
pub use keyval::{KeyValueSpec, ParseOutcome, StaticHeaderMap};

// 경고
pub use error::ParseWarning;
